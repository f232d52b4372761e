use anyhow::Result;
use libc::STDOUT_FILENO;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};
use nix::unistd::write;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

pub const ENTER_FOREGROUND_ONLY: &str = "Entering foreground-only mode (& is now ignored)\n";
pub const LEAVE_FOREGROUND_ONLY: &str = "Foreground-only mode off (& no longer ignored)\n";

/// The foreground-only switch. A single word, so the SIGTSTP handler can flip it
/// while the main flow reads it without any lock.
#[derive(Debug, Default)]
pub struct ForegroundOnly(AtomicBool);

impl ForegroundOnly {
    pub const fn new() -> Self {
        ForegroundOnly(AtomicBool::new(false))
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Flips the mode and returns the notice for the mode just entered.
    pub fn toggle(&self) -> &'static str {
        if self.0.fetch_xor(true, Ordering::Relaxed) {
            LEAVE_FOREGROUND_ONLY
        } else {
            ENTER_FOREGROUND_ONLY
        }
    }
}

pub static FOREGROUND_ONLY: ForegroundOnly = ForegroundOnly::new();

// Async-signal context: one atomic op and a raw write(2), nothing buffered.
extern "C" fn handle_sigtstp(_: i32) {
    let notice = FOREGROUND_ONLY.toggle();
    let _ = write(STDOUT_FILENO, notice.as_bytes());
}

pub(crate) fn install_sigtstp_handler() -> Result<()> {
    debug!("🔧 SIGNAL: Installing SIGTSTP handler");
    let handler = SigHandler::Handler(handle_sigtstp);
    // SA_RESTART keeps a blocking waitpid or read going across the toggle.
    let action = SigAction::new(handler, SaFlags::SA_RESTART, SigSet::empty());
    unsafe {
        sigaction(Signal::SIGTSTP, &action)?;
    }
    Ok(())
}

pub(crate) fn ignore_signal(signal: Signal) -> Result<()> {
    let action = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
    unsafe {
        sigaction(signal, &action)?;
    }
    Ok(())
}
