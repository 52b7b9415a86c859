// ── Site identity ──
//
// Sites are owned by the host; we only ever see their integer id and
// attach attributes under the keys below.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Meta key holding the site's encrypted monitoring API key.
pub const API_KEY_META: &str = "sitemon_monitor_api_key";

/// Meta key holding the "waiting for an API key" flag.
pub const WAITING_STATUS_META: &str = "sitemon_monitor_api_key_waiting_status";

/// Opaque identifier of a host-owned site record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub u64);

impl SiteId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SiteId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u64> for SiteId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        let id: SiteId = " 42 ".parse().unwrap();
        assert_eq!(id, SiteId(42));
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_non_numeric() {
        assert!("site-7".parse::<SiteId>().is_err());
        assert!("-1".parse::<SiteId>().is_err());
    }

    #[test]
    fn serializes_as_bare_integer() {
        assert_eq!(serde_json::to_string(&SiteId(7)).unwrap(), "7");
    }
}
