use super::ShellProxy;
use smsh_types::{Context, ExitStatus};

/// Prints how the last foreground job ended. Before any foreground job has run
/// this reports `exited with status 0`.
pub fn command(ctx: &Context, _argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    let last = proxy.last_foreground();
    match ctx.write_stdout(&last.outcome.to_string()) {
        Ok(_) => ExitStatus::ExitedWith(0),
        Err(e) => {
            ctx.write_stderr(&format!("status: {e}")).ok();
            ExitStatus::ExitedWith(1)
        }
    }
}
