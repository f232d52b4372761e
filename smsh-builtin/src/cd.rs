use super::ShellProxy;
use smsh_types::{Context, ExitStatus};
use std::path::Path;

pub fn command(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    let dir = match argv.get(1).map(|s| s.as_str()) {
        Some(dir) if dir.starts_with('/') => dir.to_string(),
        Some(dir) if dir.starts_with('~') => shellexpand::tilde(dir).to_string(),
        Some(dir) => match std::env::current_dir() {
            Ok(current_dir) => Path::new(&current_dir)
                .join(dir)
                .to_string_lossy()
                .into_owned(),
            Err(err) => {
                ctx.write_stderr(&format!("cd: {}: {}", err, dir)).ok();
                return ExitStatus::ExitedWith(1);
            }
        },
        None => {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.to_string_lossy().into_owned()
            } else {
                String::from("/")
            }
        }
    };

    match proxy.changepwd(&dir) {
        Ok(_) => ExitStatus::ExitedWith(0),
        Err(err) => {
            ctx.write_stderr(&format!("cd: {:#}: {}", err, dir)).ok();
            ExitStatus::ExitedWith(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::RecordingProxy;

    fn ctx() -> Context {
        Context::new()
    }

    #[test]
    fn absolute_path_is_used_as_is() {
        let mut proxy = RecordingProxy::default();
        let status = command(&ctx(), vec!["cd".into(), "/tmp".into()], &mut proxy);
        assert_eq!(status, ExitStatus::ExitedWith(0));
        assert_eq!(proxy.cwd.as_deref(), Some("/tmp"));
    }

    #[test]
    fn no_argument_goes_home() {
        let mut proxy = RecordingProxy::default();
        command(&ctx(), vec!["cd".into()], &mut proxy);
        let expected = dirs::home_dir()
            .map(|home| home.to_string_lossy().into_owned())
            .unwrap_or_else(|| "/".to_string());
        assert_eq!(proxy.cwd, Some(expected));
    }

    #[test]
    fn relative_path_joins_current_dir() {
        let mut proxy = RecordingProxy::default();
        command(&ctx(), vec!["cd".into(), "sub".into()], &mut proxy);
        let expected = std::env::current_dir().unwrap().join("sub");
        assert_eq!(proxy.cwd, Some(expected.to_string_lossy().into_owned()));
    }

    #[test]
    fn tilde_is_expanded() {
        let mut proxy = RecordingProxy::default();
        command(&ctx(), vec!["cd".into(), "~/work".into()], &mut proxy);
        let cwd = proxy.cwd.unwrap();
        assert!(!cwd.starts_with('~'), "tilde not expanded: {cwd}");
        assert!(cwd.ends_with("/work"));
    }
}
