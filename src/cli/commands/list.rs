//! List command implementation.
//!
//! The `cacheprobe list` command shows the probes in execution order.

use serde::Serialize;

use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::probes::{default_probes, Probe};
use crate::ui::{Table, UserInterface};

use super::dispatcher::{Command, CommandResult};

#[derive(Debug, Serialize)]
struct ProbeEntry<'a> {
    position: usize,
    name: &'a str,
    title: &'a str,
}

/// The list command implementation.
pub struct ListCommand {
    args: ListArgs,
    probes: Vec<Box<dyn Probe>>,
}

impl ListCommand {
    /// Create a new list command over the built-in probes.
    pub fn new(args: ListArgs) -> Self {
        Self {
            args,
            probes: default_probes(),
        }
    }

    fn entries(&self) -> Vec<ProbeEntry<'_>> {
        self.probes
            .iter()
            .enumerate()
            .map(|(i, p)| ProbeEntry {
                position: i + 1,
                name: p.name(),
                title: p.title(),
            })
            .collect()
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let entries = self.entries();

        if self.args.json {
            ui.data(&serde_json::to_string_pretty(&entries)?);
            return Ok(CommandResult::success());
        }

        let mut table = Table::new(["#", "NAME", "TITLE"]);
        for entry in &entries {
            table.add_row([entry.position.to_string(), entry.name.into(), entry.title.into()]);
        }
        for line in table.render() {
            ui.message(&line);
        }

        Ok(CommandResult::success())
    }
}
