//! Signup allowlist parsing.

use std::collections::HashSet;

/// Lower-cased, deduplicated signup allowlist in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailAllowlist {
    entries: Vec<String>,
    index: HashSet<String>,
}

impl EmailAllowlist {
    /// Parse a free-text blob where addresses are separated by commas,
    /// semicolons or newlines.
    ///
    /// Entries are trimmed and lower-cased; blank segments are dropped.
    /// Nothing else is validated, so malformed entries pass through.
    pub fn parse(raw: &str) -> Self {
        let mut allowlist = Self::default();
        for segment in raw.split([',', ';', '\n', '\r']) {
            let email = segment.trim().to_lowercase();
            if email.is_empty() {
                continue;
            }
            if allowlist.index.insert(email.clone()) {
                allowlist.entries.push(email);
            }
        }
        allowlist
    }

    /// Case-insensitive membership check.
    pub fn contains(&self, email: &str) -> bool {
        self.index.contains(&email.trim().to_lowercase())
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalize an allowlist blob into its ordered, unique entries.
pub fn normalize_allowlist(raw: &str) -> Vec<String> {
    EmailAllowlist::parse(raw).entries
}
