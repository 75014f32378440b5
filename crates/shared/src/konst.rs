/// Protocol name the Networkmap section must carry; anything else is a fatal
/// configuration error at load time.
pub const SUPPORTED_PROTOCOL: &str = "LLDP";

/// Profile name tried when no hostname-glob rule matches a host.
pub const DEFAULT_AUTH_PROFILE: &str = "default";

/// Default per-command read buffer cap, used when `SSH.MaximumBytesToReceive` is absent.
pub const DEFAULT_MAX_BYTES_TO_RECEIVE: usize = 65536;

/// Default SSH connect/command timeout in seconds, used when `SSH.Timeout` is absent.
pub const DEFAULT_SSH_TIMEOUT_SECS: f64 = 10.0;

/// Default cap on SSH connect attempts, used when `SSH.MaximumAttempts` is absent.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay between output drains while waiting for a command's prompt marker.
pub const READ_POLL_INTERVAL_MS: u64 = 100;

/// Consecutive empty reads required, alongside the prompt marker, before a
/// command's output is considered complete.
pub const QUIESCENT_EMPTY_READS: u32 = 3;
