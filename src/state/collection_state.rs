// ============================================================================
// COLLECTION STATE - Local cache of a remotely fetched list
// ============================================================================
// Each fetch takes a ticket. What happens to a result that resolves after a
// newer fetch was started depends on the SyncPolicy.
// ============================================================================

use std::cell::{Cell, RefCell};

use serde::Serialize;

use crate::models::Notice;
use crate::services::collection_service::FetchOutcome;
use crate::state::reactivity::ReactiveState;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SyncPolicy {
    /// Whatever resolves last is displayed, even an older request.
    #[default]
    LastResolvedWins,
    /// Results of requests superseded by a newer one are discarded.
    LatestRequestWins,
}

/// Issued by `begin_fetch`; sequence numbers grow monotonically.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FetchTicket {
    seq: u64,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Everything a list view renders, handed to the page in one value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSnapshot<T> {
    pub items: Vec<T>,
    pub notice: Option<Notice>,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct CollectionState<T> {
    items: ReactiveState<Vec<T>>,
    notice: RefCell<Option<Notice>>,
    error: RefCell<Option<String>>,
    issued: Cell<u64>,
    in_flight: Cell<usize>,
    policy: SyncPolicy,
}

impl<T: Clone> CollectionState<T> {
    pub fn new(policy: SyncPolicy) -> Self {
        Self {
            items: ReactiveState::new(Vec::new()),
            notice: RefCell::new(None),
            error: RefCell::new(None),
            issued: Cell::new(0),
            in_flight: Cell::new(0),
            policy,
        }
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    pub fn begin_fetch(&self) -> FetchTicket {
        let seq = self.issued.get() + 1;
        self.issued.set(seq);
        self.in_flight.set(self.in_flight.get() + 1);
        *self.error.borrow_mut() = None;
        FetchTicket { seq }
    }

    fn finish(&self, ticket: FetchTicket) -> bool {
        self.in_flight.set(self.in_flight.get().saturating_sub(1));
        let stale = ticket.seq < self.issued.get();
        if stale && self.policy == SyncPolicy::LatestRequestWins {
            log::debug!(
                "⏭️ Discarding stale fetch #{} (latest is #{})",
                ticket.seq,
                self.issued.get()
            );
            return false;
        }
        true
    }

    /// Applies a successful fetch. Returns whether it was applied.
    pub fn resolve(&self, ticket: FetchTicket, outcome: FetchOutcome<T>) -> bool {
        if !self.finish(ticket) {
            return false;
        }
        *self.error.borrow_mut() = None;
        *self.notice.borrow_mut() = outcome.notice;
        if !outcome.keep_items {
            self.items.set(outcome.items);
        }
        true
    }

    /// Records a failed fetch. The cached items are kept.
    pub fn reject(&self, ticket: FetchTicket, notice: Notice) -> bool {
        if !self.finish(ticket) {
            return false;
        }
        *self.error.borrow_mut() = Some(notice.message.clone());
        *self.notice.borrow_mut() = Some(notice);
        true
    }

    pub fn items(&self) -> Vec<T> {
        self.items.snapshot()
    }

    pub fn len(&self) -> usize {
        self.items.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Patch cached items in place (optimistic local changes).
    pub fn patch<F>(&self, updater: F)
    where
        F: FnOnce(&mut Vec<T>),
    {
        self.items.update(updater);
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.get() > 0
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice.borrow().clone()
    }

    pub fn set_notice(&self, notice: Notice) {
        *self.notice.borrow_mut() = Some(notice);
    }

    /// Returns and clears the pending notice (snackbar closed).
    pub fn take_notice(&self) -> Option<Notice> {
        self.notice.borrow_mut().take()
    }

    pub fn snapshot(&self) -> CollectionSnapshot<T> {
        CollectionSnapshot {
            items: self.items(),
            notice: self.notice(),
            is_loading: self.is_loading(),
            error: self.error(),
        }
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.items.subscribe(callback);
    }
}
