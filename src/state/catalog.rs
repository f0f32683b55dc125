use tracing::{debug, warn};

use super::data::Product;
use crate::error::ApiError;

/// User-facing message for any failed list fetch
pub const FETCH_FAILED: &str = "Failed to fetch products";

/// Fetch lifecycle of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Failed,
}

/// Identifies one issued list request. Only the most recent one is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// The Catalog holds the product list mirrored from the backend,
/// the search filter and the fetch lifecycle.
#[derive(Debug)]
pub struct CatalogStore {
    items: Vec<Product>,
    filter_text: String,
    phase: Phase,
    last_error: Option<String>,
    /// Ticket number of the latest issued request
    latest_request: u64,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    /// An empty catalog, waiting for its first load
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            filter_text: String::new(),
            phase: Phase::Loading,
            last_error: None,
            latest_request: 0,
        }
    }

    /// Start a list fetch. The phase flips to `Loading` right away;
    /// the caller performs the request and reports back via `apply_load`.
    pub fn load(&mut self) -> LoadTicket {
        self.latest_request += 1;
        self.phase = Phase::Loading;
        debug!("Catalog load #{} issued", self.latest_request);
        LoadTicket(self.latest_request)
    }

    /// Re-fetch after an add or a manual retry
    pub fn refresh(&mut self) -> LoadTicket {
        self.load()
    }

    /// Apply the outcome of a list fetch.
    /// Returns false if the ticket was superseded and the result dropped.
    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Product>, ApiError>,
    ) -> bool {
        if ticket.0 != self.latest_request {
            debug!(
                "Dropping stale catalog response #{} (latest is #{})",
                ticket.0, self.latest_request
            );
            return false;
        }

        match result {
            Ok(products) => {
                debug!("Catalog load #{} returned {} products", ticket.0, products.len());
                self.items = products;
                self.phase = Phase::Ready;
                self.last_error = None;
            }
            Err(err) => {
                warn!("Error fetching products: {err}");
                // Keep the previous items so a failed refresh doesn't blank the grid
                self.phase = Phase::Failed;
                self.last_error = Some(FETCH_FAILED.to_string());
            }
        }
        true
    }

    /// Store the search text verbatim
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// True when the filter has something other than whitespace
    pub fn has_filter(&self) -> bool {
        !self.filter_text.trim().is_empty()
    }

    /// Products matching the current filter, in server order
    pub fn visible(&self) -> Vec<&Product> {
        let needle = self.filter_text.trim().to_lowercase();
        if needle.is_empty() {
            return self.items.iter().collect();
        }
        self.items.iter().filter(|p| p.matches(&needle)).collect()
    }

    /// Number of products matching the current filter
    pub fn result_count(&self) -> usize {
        self.visible().len()
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Only set while the phase is `Failed`
    pub fn last_error(&self) -> Option<&str> {
        match self.phase {
            Phase::Failed => self.last_error.as_deref(),
            _ => None,
        }
    }

    /// How many list requests have been issued so far
    pub fn requests_issued(&self) -> u64 {
        self.latest_request
    }
}
