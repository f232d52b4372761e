#![allow(clippy::module_inception)]

pub mod fork;
pub mod job;
pub mod process;
pub mod redirect;
pub mod signal;
pub mod state;
pub mod wait;

pub use job::Job;
pub use process::Process;
pub use redirect::Redirect;
pub use signal::{FOREGROUND_ONLY, ForegroundOnly};
pub use state::{Origin, ProcessState};
pub use wait::{reap_all, reap_sweep, wait_foreground};
