use crate::shell::APP_NAME;
use smsh_types::SmshError;
use std::io::Write;
use tracing::debug;

/// Display error in a user-friendly format without stack traces.
pub fn display_user_error(err: &anyhow::Error) {
    debug!("user error: {:?}", err);
    let msg = match err.downcast_ref::<SmshError>() {
        Some(SmshError::Parse(msg)) => syntax_error(msg),
        _ => format!("{err:#}"),
    };
    writeln!(std::io::stderr(), "{APP_NAME}: {msg}").ok();
}

/// Condenses pest's multi-line report to `syntax error at <line:col>: <expectation>`.
fn syntax_error(msg: &str) -> String {
    let position = msg
        .lines()
        .find_map(|line| line.trim().strip_prefix("-->"))
        .map(str::trim);
    let expected = msg
        .lines()
        .find_map(|line| line.trim().strip_prefix('='))
        .map(str::trim);

    match (position, expected) {
        (Some(position), Some(expected)) => format!("syntax error at {position}: {expected}"),
        _ => format!("syntax error: {}", msg.trim()),
    }
}
