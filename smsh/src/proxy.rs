use crate::shell::Shell;
use anyhow::Result;
use smsh_builtin::ShellProxy;
use smsh_types::LastForeground;
use tracing::debug;

impl ShellProxy for Shell {
    fn exit_shell(&mut self) {
        self.exit();
    }

    fn changepwd(&mut self, path: &str) -> Result<()> {
        debug!("changepwd {}", path);
        std::env::set_current_dir(path)?;
        Ok(())
    }

    fn last_foreground(&self) -> LastForeground {
        Shell::last_foreground(self)
    }
}
