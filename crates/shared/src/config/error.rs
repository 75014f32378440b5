use thiserror::Error;

/// A fatal, pre-crawl configuration problem. Any of these halts the program
/// before any SSH activity starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("[Networkmap] Protocol must be \"LLDP\", found \"{0}\"")]
    UnsupportedProtocol(String),

    #[error("Auth profile \"{0}\" referenced but not defined as [Auth.{0}]")]
    MissingProfile(String),

    #[error(
        "Auth.{0} must set exactly one of (username, password), (username, key), or (username, password, key)"
    )]
    MalformedProfile(String),
}
