use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Terminal outcome of exploring one host, recorded on its Device entry.
///
/// `Ok` is the only status under which the crawl controller enqueues neighbors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    Ok,
    NoAuthRequested,
    AuthFailed,
    Unreachable,
    Unrecognized,
    ParseFailed,
}

impl DeviceStatus {
    /// Whether a device with this status should have its neighbors enqueued.
    pub fn allows_expansion(self) -> bool {
        matches!(self, DeviceStatus::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&DeviceStatus::NoAuthRequested).unwrap();
        assert_eq!(json, "\"NO_AUTH_REQUESTED\"");
    }

    #[test]
    fn only_ok_allows_expansion() {
        assert!(DeviceStatus::Ok.allows_expansion());
        assert!(!DeviceStatus::AuthFailed.allows_expansion());
        assert!(!DeviceStatus::Unreachable.allows_expansion());
        assert!(!DeviceStatus::Unrecognized.allows_expansion());
        assert!(!DeviceStatus::ParseFailed.allows_expansion());
        assert!(!DeviceStatus::NoAuthRequested.allows_expansion());
    }
}
