// ── Process-wide options ──
//
// Read-only view of host configuration. The integration only ever asks
// for the (encrypted) team credential.

use std::collections::HashMap;

/// Option holding the encrypted team-level credential.
pub const TEAM_API_KEY_OPTION: &str = "monitor_teams_api_key";

/// Read-only lookup of process-wide options by name.
pub trait OptionSource: Send + Sync {
    fn option(&self, name: &str) -> Option<String>;
}

impl OptionSource for HashMap<String, String> {
    fn option(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Fixed option set, built up front.
#[derive(Debug, Clone, Default)]
pub struct StaticOptions {
    values: HashMap<String, String>,
}

impl StaticOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl OptionSource for StaticOptions {
    fn option(&self, name: &str) -> Option<String> {
        self.values.option(name)
    }
}

impl FromIterator<(String, String)> for StaticOptions {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
