//! Pagination types
//!
//! The page envelope returned by TronGrid's `/v1` listing endpoints and the
//! query filters accepted by them.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

/// One decoded page of a TronGrid listing
///
/// ```json
/// { "data": [...], "success": true, "meta": { "links": { "next": "..." } } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Items of this page, in service order
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// `false` means the service rejected the request
    pub success: bool,
    /// Paging metadata
    #[serde(default)]
    pub meta: PageMeta,
    /// Error message sent along with `success: false`
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Page<T> {
    /// Continuation URL, `None` when absent or empty
    pub fn next_url(&self) -> Option<&str> {
        self.meta.links.next.as_deref().filter(|s| !s.is_empty())
    }
}

/// Paging metadata of a [`Page`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    /// Server timestamp of the response (ms)
    #[serde(default)]
    pub at: Option<i64>,
    /// Number of items in this page
    #[serde(default)]
    pub page_size: Option<u32>,
    /// Opaque continuation token
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub links: PageLinks,
}

/// Links of a [`Page`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageLinks {
    /// Fully-qualified URL of the next page
    #[serde(default)]
    pub next: Option<String>,
}

/// Filters for transaction listings
///
/// Every field is independently optional. Unset fields are not sent, so the
/// service applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub only_confirmed: Option<bool>,
    pub only_unconfirmed: Option<bool>,
    pub only_to: Option<bool>,
    pub only_from: Option<bool>,
    /// Page size
    pub limit: Option<u32>,
    /// Continuation token from a previous page's `meta.fingerprint`
    pub fingerprint: Option<String>,
    /// Lower bound on block timestamp (ms)
    pub min_timestamp: Option<i64>,
    /// Upper bound on block timestamp (ms)
    pub max_timestamp: Option<i64>,
    /// Include internal transactions (account listings)
    pub search_internal: Option<bool>,
    /// e.g. `block_timestamp,asc` (contract listings)
    pub order_by: Option<String>,
    /// Restrict to one token contract (contract listings)
    pub contract_address: Option<String>,
}

impl QueryOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn only_confirmed(mut self, value: bool) -> Self {
        self.only_confirmed = Some(value);
        self
    }

    #[must_use]
    pub fn only_unconfirmed(mut self, value: bool) -> Self {
        self.only_unconfirmed = Some(value);
        self
    }

    #[must_use]
    pub fn only_to(mut self, value: bool) -> Self {
        self.only_to = Some(value);
        self
    }

    #[must_use]
    pub fn only_from(mut self, value: bool) -> Self {
        self.only_from = Some(value);
        self
    }

    /// Set page size
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    #[must_use]
    pub fn min_timestamp(mut self, millis: i64) -> Self {
        self.min_timestamp = Some(millis);
        self
    }

    #[must_use]
    pub fn max_timestamp(mut self, millis: i64) -> Self {
        self.max_timestamp = Some(millis);
        self
    }

    /// Restrict to transactions at or after `time`
    #[must_use]
    pub fn since(self, time: DateTime<Utc>) -> Self {
        self.min_timestamp(time.timestamp_millis())
    }

    /// Restrict to transactions at or before `time`
    #[must_use]
    pub fn until(self, time: DateTime<Utc>) -> Self {
        self.max_timestamp(time.timestamp_millis())
    }

    #[must_use]
    pub fn search_internal(mut self, value: bool) -> Self {
        self.search_internal = Some(value);
        self
    }

    #[must_use]
    pub fn order_by(mut self, order: impl Into<String>) -> Self {
        self.order_by = Some(order.into());
        self
    }

    #[must_use]
    pub fn contract_address(mut self, address: impl Into<String>) -> Self {
        self.contract_address = Some(address.into());
        self
    }

    /// Query parameters for the set fields
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(ref v) = self.fingerprint {
            pairs.push(("fingerprint", v.clone()));
        }
        if let Some(v) = self.min_timestamp {
            pairs.push(("min_timestamp", v.to_string()));
        }
        if let Some(v) = self.max_timestamp {
            pairs.push(("max_timestamp", v.to_string()));
        }
        if let Some(v) = self.limit {
            pairs.push(("limit", v.to_string()));
        }
        if let Some(v) = self.only_confirmed {
            pairs.push(("only_confirmed", v.to_string()));
        }
        if let Some(v) = self.only_unconfirmed {
            pairs.push(("only_unconfirmed", v.to_string()));
        }
        if let Some(v) = self.only_from {
            pairs.push(("only_from", v.to_string()));
        }
        if let Some(v) = self.only_to {
            pairs.push(("only_to", v.to_string()));
        }
        if let Some(v) = self.search_internal {
            pairs.push(("search_internal", v.to_string()));
        }
        if let Some(ref v) = self.order_by {
            pairs.push(("order_by", v.clone()));
        }
        if let Some(ref v) = self.contract_address {
            pairs.push(("contract_address", v.clone()));
        }

        pairs
    }

    /// Append the set fields to `url`'s query string
    pub fn apply_to(&self, url: &mut Url) {
        let pairs = self.query_pairs();
        if pairs.is_empty() {
            return;
        }

        let mut query = url.query_pairs_mut();
        for (key, value) in pairs {
            query.append_pair(key, &value);
        }
    }
}
