//! Substring search over client and quote lists

use crate::models::{Client, QuoteSummary};

/// Something a list screen can search by name and one secondary key
pub trait Searchable {
    fn first_name(&self) -> &str;
    fn last_name(&self) -> &str;
    /// Email for clients, quote number for quotes
    fn secondary_key(&self) -> &str;

    /// Case-insensitive match on "first last" or the secondary key.
    /// `needle` must already be lower-cased.
    fn matches(&self, needle: &str) -> bool {
        let full_name = format!("{} {}", self.first_name(), self.last_name()).to_lowercase();
        full_name.contains(needle) || self.secondary_key().to_lowercase().contains(needle)
    }
}

impl Searchable for Client {
    fn first_name(&self) -> &str {
        &self.first_name
    }

    fn last_name(&self) -> &str {
        &self.last_name
    }

    fn secondary_key(&self) -> &str {
        &self.email_address
    }
}

impl Searchable for QuoteSummary {
    fn first_name(&self) -> &str {
        &self.first_name
    }

    fn last_name(&self) -> &str {
        &self.last_name
    }

    fn secondary_key(&self) -> &str {
        &self.quote_number
    }
}

/// Keep the items matching `query`. An empty query keeps everything. The
/// query is not trimmed, so `"ana "` only matches names with a space after
/// "ana".
pub fn filter<T: Searchable>(items: Vec<T>, query: Option<&str>) -> Vec<T> {
    let needle = query.unwrap_or_default().to_lowercase();
    if needle.is_empty() {
        return items;
    }
    items.into_iter().filter(|item| item.matches(&needle)).collect()
}
