mod ansi;
mod client;
mod driver;
mod error;

pub use ansi::strip_ansi;
pub use driver::SshSession;
pub use error::SessionError;
