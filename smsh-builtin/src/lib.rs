use anyhow::Result;
use once_cell::sync::Lazy;
use smsh_types::{Context, ExitStatus, LastForeground};
use std::collections::HashMap;
use tracing::debug;

// Builtin command modules
pub mod cd;
pub mod status;

/// Trait that provides an interface for builtin commands to interact with the shell
/// This allows builtin commands to perform shell operations without direct coupling
pub trait ShellProxy {
    /// Reaps every remaining child, then marks the shell as finished
    fn exit_shell(&mut self);

    /// Changes the current working directory of the shell process
    fn changepwd(&mut self, path: &str) -> Result<()>;

    /// Outcome of the most recent foreground job
    fn last_foreground(&self) -> LastForeground;
}

/// Type alias for builtin command function signature
/// All builtin commands must conform to this signature
pub type BuiltinCommand =
    fn(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus;

/// Global registry of all builtin commands
pub static BUILTIN_COMMAND: Lazy<HashMap<&'static str, BuiltinCommand>> = Lazy::new(|| {
    let mut builtin = HashMap::new();
    builtin.insert("exit", exit as BuiltinCommand);
    builtin.insert("cd", cd::command as BuiltinCommand);
    builtin.insert("status", status::command as BuiltinCommand);
    builtin
});

/// Retrieves a builtin command function by name
/// Returns None if the command is not found
pub fn get_command(name: &str) -> Option<BuiltinCommand> {
    BUILTIN_COMMAND.get(name).copied()
}

/// Built-in exit command implementation.
/// Blocks until every child has been reaped; the shell stops once this returns.
pub fn exit(_ctx: &Context, _argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    debug!("Exit command called - reaping children before shell exit");
    proxy.exit_shell();
    ExitStatus::ExitedWith(0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use smsh_types::ForegroundOutcome;

    #[derive(Default)]
    pub(crate) struct RecordingProxy {
        pub exited: bool,
        pub cwd: Option<String>,
        pub last: LastForeground,
    }

    impl ShellProxy for RecordingProxy {
        fn exit_shell(&mut self) {
            self.exited = true;
        }

        fn changepwd(&mut self, path: &str) -> Result<()> {
            self.cwd = Some(path.to_string());
            Ok(())
        }

        fn last_foreground(&self) -> LastForeground {
            self.last
        }
    }

    #[test]
    fn registry_knows_core_builtins() {
        for name in ["cd", "exit", "status"] {
            assert!(get_command(name).is_some(), "{name} missing");
        }
        assert!(get_command("ls").is_none());
        assert!(get_command("jobs").is_none());
    }

    #[test]
    fn exit_asks_shell_to_finish() {
        let ctx = Context::new();
        let mut proxy = RecordingProxy {
            last: LastForeground {
                pid: None,
                outcome: ForegroundOutcome::Exited(3),
            },
            ..Default::default()
        };
        let status = exit(&ctx, vec!["exit".to_string()], &mut proxy);
        assert!(proxy.exited);
        assert_eq!(status, ExitStatus::ExitedWith(0));
    }
}
