use thiserror::Error;

/// Failure resolving credentials for a host. `NoAuthRequested` is not really a
/// failure, it is a signal: the caller must skip this host rather than attempt
/// a connection.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("host matched a rule with an empty profile; skip without connecting")]
    NoAuthRequested,

    #[error("profile \"{0}\" is referenced but not defined as [Auth.{0}]")]
    MissingProfile(String),

    #[error("no auth rule matched and neither device-type nor default profile exists: {0}")]
    AuthConfigError(String),
}
