//! Inventory command implementation.
//!
//! The `cacheprobe inventory` command sizes every configured cache
//! directory without running any probe.

use crate::cache::{CacheInventory, DirectorySizer};
use crate::cli::args::InventoryArgs;
use crate::config::HarnessConfig;
use crate::error::Result;
use crate::shell::ProcessRunner;
use crate::ui::{Table, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The inventory command implementation.
pub struct InventoryCommand {
    context: CommandContext,
    args: InventoryArgs,
}

impl InventoryCommand {
    pub fn new(context: CommandContext, args: InventoryArgs) -> Self {
        Self { context, args }
    }

    fn show(
        &self,
        config: &HarnessConfig,
        sizer: &DirectorySizer,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let inventory = CacheInventory::collect(config, sizer);

        if self.args.json {
            ui.data(&serde_json::to_string_pretty(&inventory)?);
            return Ok(CommandResult::success());
        }

        let yes_no = |flag: bool| if flag { "yes" } else { "no" }.to_string();
        let mut table = Table::new(["NAME", "SIZE", "EXISTS", "WRITABLE", "PATH"]);
        for (name, info) in inventory.iter() {
            table.add_row([
                name.to_string(),
                info.size.clone(),
                yes_no(info.exists),
                yes_no(info.writable),
                info.path.display().to_string(),
            ]);
        }
        for line in table.render() {
            ui.message(&line);
        }

        Ok(CommandResult::success())
    }
}

impl Command for InventoryCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.context.load_config()?;
        let sizer = DirectorySizer::new(ProcessRunner::new(&config.project_root));
        self.show(&config, &sizer, ui)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PIP_CACHE;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn fixture(temp: &TempDir) -> (HarnessConfig, DirectorySizer) {
        let config = HarnessConfig::new(temp.path(), temp.path().join("home"));
        let sizer = DirectorySizer::walk_only(ProcessRunner::new(temp.path()));
        (config, sizer)
    }

    #[test]
    fn table_has_one_row_per_cache_dir() {
        let temp = TempDir::new().unwrap();
        let (config, sizer) = fixture(&temp);
        let cmd = InventoryCommand::new(CommandContext::new(temp.path()), InventoryArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.show(&config, &sizer, &mut ui).unwrap();

        assert!(result.success);
        assert_eq!(ui.messages().len(), config.cache_dirs().len() + 1);
        assert!(ui.messages()[0].starts_with("NAME"));
        assert!(ui.messages()[1].starts_with("pip "));
        assert!(ui.messages()[1].contains("0 B"));
    }

    #[test]
    fn json_maps_names_to_details() {
        let temp = TempDir::new().unwrap();
        let (config, sizer) = fixture(&temp);
        let pip = config.cache_dir(PIP_CACHE).unwrap().to_path_buf();
        fs::create_dir_all(&pip).unwrap();
        fs::write(pip.join("wheel"), vec![0u8; 2048]).unwrap();
        let cmd = InventoryCommand::new(
            CommandContext::new(temp.path()),
            InventoryArgs { json: true },
        );
        let mut ui = MockUI::new();

        cmd.show(&config, &sizer, &mut ui).unwrap();

        let value: serde_json::Value = serde_json::from_str(&ui.data_output()[0]).unwrap();
        assert_eq!(value["pip"]["exists"], true);
        assert_eq!(value["pip"]["size"], "2.0 KB");
        assert_eq!(value["npm"]["exists"], false);
        assert_eq!(value["npm"]["size"], "0 B");
    }
}
