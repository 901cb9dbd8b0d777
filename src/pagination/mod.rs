//! Incremental fetch bookkeeping.
//!
//! [`PaginationDriver`] decides whether a page may be requested and tracks
//! the store's continuation cursor. Fetches are split into a ticket handed
//! out before the store call and a completion that presents the ticket back.
//! Every [`reset`](PaginationDriver::reset) starts a new generation, and
//! completions from an older generation are discarded so a page requested
//! before a refresh cannot leak stale records into the cleared list.

use crate::store::PageRequest;
use tracing::{debug, warn};

/// Default number of records requested per page.
pub const DEFAULT_PAGE_LIMIT: usize = 150;

/// Permission to run one page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    generation: u64,
    /// Request to send to the store.
    pub page: PageRequest,
}

impl PageTicket {
    /// Generation the ticket was issued in.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Permission to run one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    /// Normalized search term.
    pub term: String,
}

impl SearchTicket {
    /// Generation the ticket was issued in.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Cursor and in-flight state of a paginated list.
#[derive(Debug, Clone)]
pub struct PaginationDriver {
    cursor: Option<String>,
    in_flight: bool,
    searching: bool,
    page_limit: usize,
    generation: u64,
}

impl Default for PaginationDriver {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT)
    }
}

impl PaginationDriver {
    /// Creates a driver requesting `page_limit` records per page.
    pub fn new(page_limit: usize) -> Self {
        Self {
            cursor: None,
            in_flight: false,
            searching: false,
            page_limit,
            generation: 0,
        }
    }

    /// Continuation token for the next page.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Whether a page fetch or search is outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether the list shows search results.
    pub fn is_search(&self) -> bool {
        self.searching
    }

    /// Records requested per page.
    pub fn page_limit(&self) -> usize {
        self.page_limit
    }

    /// Changes the page size for subsequent fetches.
    pub fn set_page_limit(&mut self, page_limit: usize) {
        self.page_limit = page_limit;
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a page fetch.
    ///
    /// Returns `None` while a search is shown or another fetch is
    /// outstanding, so repeated calls collapse into a single fetch.
    pub fn begin_page(&mut self) -> Option<PageTicket> {
        if self.searching || self.in_flight {
            debug!(
                searching = self.searching,
                in_flight = self.in_flight,
                "page request coalesced"
            );
            return None;
        }
        self.in_flight = true;
        Some(PageTicket {
            generation: self.generation,
            page: PageRequest {
                next_page_token: self.cursor.clone(),
                limit: self.page_limit,
            },
        })
    }

    /// Completes a page fetch.
    ///
    /// Returns `false` if the ticket is from an older generation; its
    /// records must be dropped. Otherwise advances the cursor when the store
    /// returned one and returns `true`.
    pub fn finish_page(&mut self, ticket: &PageTicket, next_page_token: Option<String>) -> bool {
        if ticket.generation != self.generation {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding page fetched before a reset"
            );
            return false;
        }
        self.in_flight = false;
        if next_page_token.is_some() {
            self.cursor = next_page_token;
        }
        true
    }

    /// Marks a page fetch as failed. The cursor is kept so the same page can
    /// be requested again.
    pub fn fail_page(&mut self, ticket: &PageTicket) {
        if ticket.generation == self.generation {
            self.in_flight = false;
        }
    }

    /// Starts a search with an already normalized term.
    ///
    /// Any outstanding page fetch becomes stale.
    pub fn begin_search(&mut self, term: impl Into<String>) -> SearchTicket {
        self.generation += 1;
        self.searching = true;
        self.in_flight = true;
        SearchTicket {
            generation: self.generation,
            term: term.into(),
        }
    }

    /// Completes a search, successful or not.
    ///
    /// Returns `false` if the list was reset or searched again meanwhile.
    pub fn finish_search(&mut self, ticket: &SearchTicket) -> bool {
        if ticket.generation != self.generation {
            debug!(ticket = ticket.generation, "discarding superseded search");
            return false;
        }
        self.in_flight = false;
        true
    }

    /// Forgets the cursor and search state and invalidates outstanding
    /// fetches.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.cursor = None;
        self.in_flight = false;
        self.searching = false;
    }

    /// Releases the in-flight flag of a fetch of `generation` that will
    /// never complete. The cursor and search state are kept.
    pub fn abandon(&mut self, generation: u64) {
        if generation == self.generation && self.in_flight {
            debug!(generation, "fetch abandoned before completion");
            self.in_flight = false;
        }
    }

    /// Guards the store call of a fetch issued in `generation`.
    ///
    /// Dropping the guard without [`FetchGuard::settle`] abandons the
    /// fetch, so a caller that stops awaiting it does not leave the driver
    /// in flight forever.
    pub fn guard(&mut self, generation: u64) -> FetchGuard<'_> {
        FetchGuard {
            driver: self,
            generation,
            settled: false,
        }
    }
}

/// Abandons an outstanding fetch when dropped unsettled.
#[derive(Debug)]
pub struct FetchGuard<'a> {
    driver: &'a mut PaginationDriver,
    generation: u64,
    settled: bool,
}

impl FetchGuard<'_> {
    /// Marks the store call as finished; its outcome is reported separately.
    pub fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.driver.abandon(self.generation);
        }
    }
}
