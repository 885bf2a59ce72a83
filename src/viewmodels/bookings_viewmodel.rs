// ============================================================================
// BOOKINGS VIEWMODEL - Filter, fetch and local approve/cancel
// ============================================================================

use std::cell::RefCell;

use crate::error::{FetchError, MutationError};
use crate::models::{Booking, BookingAction, BookingFilter, Notice};
use crate::services::{apply_booking_action, ApiClient, BookingsSource, CollectionClient};
use crate::state::{CollectionState, SyncPolicy};

pub struct BookingsViewModel {
    client: CollectionClient<BookingsSource>,
    state: CollectionState<Booking>,
    filter: RefCell<BookingFilter>,
}

impl BookingsViewModel {
    pub fn new(api: ApiClient, pharmacy_no: &str, policy: SyncPolicy) -> Self {
        Self::with_filter(api, pharmacy_no, policy, BookingFilter::today())
    }

    pub fn with_filter(
        api: ApiClient,
        pharmacy_no: &str,
        policy: SyncPolicy,
        filter: BookingFilter,
    ) -> Self {
        Self {
            client: CollectionClient::new(api, BookingsSource::new(pharmacy_no)),
            state: CollectionState::new(policy),
            filter: RefCell::new(filter),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_config() -> Self {
        let config = &*crate::config::CONFIG;
        Self::new(ApiClient::from_config(), &config.pharmacy_no, SyncPolicy::default())
    }

    pub fn state(&self) -> &CollectionState<Booking> {
        &self.state
    }

    pub fn filter(&self) -> BookingFilter {
        self.filter.borrow().clone()
    }

    /// Stores the filter and fetches with it.
    pub async fn set_filter(&self, filter: BookingFilter) -> Result<(), FetchError> {
        *self.filter.borrow_mut() = filter;
        self.refresh().await
    }

    /// Fetches with the current filter. A failure keeps the list on screen.
    pub async fn refresh(&self) -> Result<(), FetchError> {
        let filter = self.filter();
        let ticket = self.state.begin_fetch();
        log::info!("📅 Fetching bookings for {} (#{})", filter.formatted_date(), ticket.seq());

        match self.client.fetch(&filter).await {
            Ok(outcome) => {
                self.state.resolve(ticket, outcome);
                Ok(())
            }
            Err(e) => {
                self.state.reject(ticket, self.client.failure_notice(&e));
                Err(e)
            }
        }
    }

    pub fn approve(&self, booking_id: &str) -> Result<Notice, MutationError> {
        self.act(booking_id, BookingAction::Approve)
    }

    pub fn cancel(&self, booking_id: &str) -> Result<Notice, MutationError> {
        self.act(booking_id, BookingAction::Cancel)
    }

    fn act(&self, booking_id: &str, action: BookingAction) -> Result<Notice, MutationError> {
        let mut result = Err(MutationError::UnknownBooking(booking_id.to_string()));
        self.state.patch(|items| {
            result = apply_booking_action(items, booking_id, action);
        });
        match &result {
            Ok(notice) => self.state.set_notice(notice.clone()),
            Err(e) => {
                log::warn!("⚠️ Booking {} not {}: {}", booking_id, action.past_tense(), e);
                self.state.set_notice(Notice::error(e.to_string()));
            }
        }
        result
    }
}
