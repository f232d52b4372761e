use libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::fcntl::{OFlag, open};
use nix::sys::stat::Mode;
use nix::unistd::{close, dup2};
use smsh_types::{SmshError, SmshResult};
use std::os::unix::io::RawFd;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    Input(String),
    StdoutOutput(String),
}

impl Redirect {
    /// Opens the target and installs it as fd 0 or fd 1 of the calling process.
    /// Only ever called in a freshly forked child.
    pub(crate) fn apply(&self) -> SmshResult<()> {
        match self {
            Redirect::Input(path) => {
                let fd = open(path.as_str(), OFlag::O_RDONLY, Mode::empty())
                    .map_err(|e| open_error("input", path, e))?;
                copy_fd(fd, STDIN_FILENO)
            }
            Redirect::StdoutOutput(path) => {
                let fd = open(
                    path.as_str(),
                    OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
                    Mode::S_IRUSR | Mode::S_IWUSR | Mode::S_IRGRP | Mode::S_IROTH,
                )
                .map_err(|e| open_error("output", path, e))?;
                copy_fd(fd, STDOUT_FILENO)
            }
        }
    }
}

fn open_error(operation: &str, path: &str, errno: nix::Error) -> SmshError {
    SmshError::File {
        operation: operation.to_string(),
        path: path.to_string(),
        source: std::io::Error::from(errno),
    }
}

pub(crate) fn copy_fd(src: RawFd, dst: RawFd) -> SmshResult<()> {
    if src != dst {
        dup2(src, dst)?;
        close(src)?;
    }
    Ok(())
}
