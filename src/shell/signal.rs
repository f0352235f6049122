//! User interruption (Ctrl-C) handling.
//!
//! A SIGINT handler flips a process-wide flag. The orchestrator checks the
//! flag between probes, and a [`ProcessRunner`](super::ProcessRunner) holding
//! a token kills its in-flight child as soon as the flag is set.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Install the SIGINT handler. Safe to call more than once.
pub fn install_interrupt_handler() {
    #[cfg(unix)]
    {
        extern "C" fn on_sigint(_: libc::c_int) {
            INTERRUPTED.store(true, Ordering::SeqCst);
        }

        let handler: extern "C" fn(libc::c_int) = on_sigint;
        // SAFETY: the handler only performs an atomic store, which is
        // async-signal-safe.
        unsafe {
            libc::signal(libc::SIGINT, handler as libc::sighandler_t);
        }
    }
}

/// Whether an interrupt was received.
pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// A cancellation check polled between probes and while commands run.
///
/// The default token follows the process-wide SIGINT flag; tests use
/// [`CancellationToken::manual`] to cancel deterministically.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    manual: Option<Arc<AtomicBool>>,
}

impl CancellationToken {
    /// Token backed by the process-wide SIGINT flag.
    pub fn from_signal() -> Self {
        Self { manual: None }
    }

    /// Token cancelled only through [`CancellationToken::cancel`].
    pub fn manual() -> Self {
        Self {
            manual: Some(Arc::new(AtomicBool::new(false))),
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        match &self.manual {
            Some(flag) => flag.store(true, Ordering::SeqCst),
            None => INTERRUPTED.store(true, Ordering::SeqCst),
        }
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        match &self.manual {
            Some(flag) => flag.load(Ordering::SeqCst),
            None => interrupted(),
        }
    }
}
