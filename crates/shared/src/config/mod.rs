mod error;
mod load;
mod schema;

pub use error::ConfigError;
pub use load::load_config;
pub use schema::{AuthProfile, AuthRule, Config, NetworkmapSection, SshSection};
