// ============================================================================
// COLLECTION SERVICE - Fetch a remote list, then normalize it
// ============================================================================
// A CollectionSource knows one endpoint: how to build the request body and how
// to read the response. CollectionClient runs the exchange.
// Empty vs. malformed responses are told apart here, never upstream.
// ============================================================================

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{FetchError, GENERIC_REMOTE_ERROR};
use crate::models::{
    Booking, BookingFilter, FetchBookingsRequest, FetchVaccinesRequest, Notice, RawBooking,
    RawVaccine, ResponseStatus, Vaccine,
};
use crate::services::api_client::ApiClient;
use crate::utils::constants::{FETCH_BOOKINGS_PATH, FETCH_VACCINES_PATH};

pub const NO_BOOKINGS_MESSAGE: &str = "No bookings found for the specified date";
pub const BOOKINGS_FETCH_FAILED: &str = "Failed to fetch bookings. Please try again.";

/// Items plus an optional non-fatal notice (e.g. "nothing found").
#[derive(Clone, Debug, PartialEq)]
pub struct FetchOutcome<T> {
    pub items: Vec<T>,
    pub notice: Option<Notice>,
    /// The cached list stays as it is; only `notice` is applied.
    pub keep_items: bool,
}

impl<T> FetchOutcome<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            items,
            notice: None,
            keep_items: false,
        }
    }

    pub fn empty() -> Self {
        Self::from_items(Vec::new())
    }

    pub fn with_notice(items: Vec<T>, notice: Notice) -> Self {
        Self {
            items,
            notice: Some(notice),
            keep_items: false,
        }
    }

    /// Answer that carries no list, e.g. a rejection inside a 2xx body.
    pub fn notice_only(notice: Notice) -> Self {
        Self {
            items: Vec::new(),
            notice: Some(notice),
            keep_items: true,
        }
    }
}

pub trait CollectionSource {
    type Item;
    type Filter;

    /// Endpoint path and JSON body for a filter.
    fn request(&self, filter: &Self::Filter) -> Result<(&'static str, Value), FetchError>;

    /// Reads a 2xx body. Never fails: unknown shapes become an empty outcome.
    fn interpret(&self, filter: &Self::Filter, body: Value) -> FetchOutcome<Self::Item>;

    /// Notice shown when the exchange itself failed.
    fn failure_notice(&self, err: &FetchError) -> Notice;
}

pub struct CollectionClient<S> {
    api: ApiClient,
    source: S,
}

impl<S: CollectionSource> CollectionClient<S> {
    pub fn new(api: ApiClient, source: S) -> Self {
        Self { api, source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn fetch(&self, filter: &S::Filter) -> Result<FetchOutcome<S::Item>, FetchError> {
        let (path, body) = self.source.request(filter)?;
        let response = self.api.post_value(path, &body).await.map_err(|e| {
            log::error!("❌ Fetch {} failed: {}", path, e);
            FetchError::from(e)
        })?;
        let outcome = self.source.interpret(filter, response);
        log::info!("📦 {} → {} items", path, outcome.items.len());
        Ok(outcome)
    }

    pub fn failure_notice(&self, err: &FetchError) -> Notice {
        self.source.failure_notice(err)
    }
}

fn response_status(body: &Value) -> Option<ResponseStatus> {
    body.get("responseStatus")
        .and_then(|status| serde_json::from_value(status.clone()).ok())
}

/// Decodes each element on its own; elements that don't fit are skipped.
fn decode_items<R: DeserializeOwned>(items: &[Value], what: &str) -> Vec<R> {
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<R>(item.clone()) {
            Ok(raw) => Some(raw),
            Err(e) => {
                log::warn!("⚠️ Skipping malformed {}: {}", what, e);
                None
            }
        })
        .collect()
}

fn encode<T: serde::Serialize>(request: &T) -> Result<Value, FetchError> {
    serde_json::to_value(request).map_err(|e| FetchError::Decode(e.to_string()))
}

// ----------------------------------------------------------------------------
// Bookings
// ----------------------------------------------------------------------------

pub struct BookingsSource {
    pharmacy_no: String,
}

impl BookingsSource {
    pub fn new(pharmacy_no: impl Into<String>) -> Self {
        Self {
            pharmacy_no: pharmacy_no.into(),
        }
    }
}

impl CollectionSource for BookingsSource {
    type Item = Booking;
    type Filter = BookingFilter;

    fn request(&self, filter: &BookingFilter) -> Result<(&'static str, Value), FetchError> {
        let request = FetchBookingsRequest {
            date: filter.formatted_date(),
            status: filter.status.map(|s| s.as_str().to_string()),
            consultant_id: filter.consultant_id.clone().filter(|c| !c.is_empty()),
            pharmacy_no: self.pharmacy_no.clone(),
        };
        Ok((FETCH_BOOKINGS_PATH, encode(&request)?))
    }

    fn interpret(&self, filter: &BookingFilter, body: Value) -> FetchOutcome<Booking> {
        let date = filter.formatted_date();
        let bookings = body.get("bookings").and_then(Value::as_array);

        if let Some(list) = bookings.filter(|list| !list.is_empty()) {
            let items = decode_items::<RawBooking>(list, "booking")
                .into_iter()
                .map(|raw| raw.normalize(&date, &self.pharmacy_no))
                .collect();
            return FetchOutcome::from_items(items);
        }

        if let Some(status) = response_status(&body).filter(ResponseStatus::is_success) {
            let message = status
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| NO_BOOKINGS_MESSAGE.to_string());
            return FetchOutcome::with_notice(Vec::new(), Notice::info(message));
        }

        if bookings.is_none() {
            // Neither a list nor the sentinel: shown as an empty day
            log::warn!("⚠️ Bookings response for {} has no list", date);
        }
        FetchOutcome::empty()
    }

    fn failure_notice(&self, _err: &FetchError) -> Notice {
        Notice::error(BOOKINGS_FETCH_FAILED)
    }
}

// ----------------------------------------------------------------------------
// Vaccines
// ----------------------------------------------------------------------------

pub struct VaccinesSource {
    pharmacy_no: String,
}

impl VaccinesSource {
    pub fn new(pharmacy_no: impl Into<String>) -> Self {
        Self {
            pharmacy_no: pharmacy_no.into(),
        }
    }
}

impl CollectionSource for VaccinesSource {
    type Item = Vaccine;
    type Filter = ();

    fn request(&self, _filter: &()) -> Result<(&'static str, Value), FetchError> {
        let request = FetchVaccinesRequest {
            pharmacy_no: self.pharmacy_no.clone(),
        };
        Ok((FETCH_VACCINES_PATH, encode(&request)?))
    }

    fn interpret(&self, _filter: &(), body: Value) -> FetchOutcome<Vaccine> {
        match response_status(&body) {
            Some(status) if status.is_success() => {
                let items = body
                    .get("vaccineList")
                    .and_then(Value::as_array)
                    .map(|list| decode_items::<RawVaccine>(list, "vaccine"))
                    .unwrap_or_default()
                    .into_iter()
                    .map(|raw| raw.normalize(&self.pharmacy_no))
                    .collect();
                FetchOutcome::from_items(items)
            }
            Some(status) => {
                let message = status
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_REMOTE_ERROR.to_string());
                log::warn!("⚠️ Vaccine fetch rejected: {}", message);
                FetchOutcome::notice_only(fetch_vaccines_error(message))
            }
            None => {
                log::warn!("⚠️ Vaccine response has no responseStatus");
                FetchOutcome::empty()
            }
        }
    }

    fn failure_notice(&self, err: &FetchError) -> Notice {
        fetch_vaccines_error(err)
    }
}

fn fetch_vaccines_error(reason: impl std::fmt::Display) -> Notice {
    Notice::error(format!("Error fetching vaccines: {}", reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, Severity, VaccineStatus};
    use crate::test_support::{FakeTransport, TEST_BASE_URL, TEST_PHARMACY};
    use chrono::NaiveDate;
    use futures::executor::block_on;
    use serde_json::json;
    use std::rc::Rc;

    fn bookings(transport: &FakeTransport) -> CollectionClient<BookingsSource> {
        let api = ApiClient::new(TEST_BASE_URL, Rc::new(transport.clone()));
        CollectionClient::new(api, BookingsSource::new(TEST_PHARMACY))
    }

    fn vaccines(transport: &FakeTransport) -> CollectionClient<VaccinesSource> {
        let api = ApiClient::new(TEST_BASE_URL, Rc::new(transport.clone()));
        CollectionClient::new(api, VaccinesSource::new(TEST_PHARMACY))
    }

    fn filter() -> BookingFilter {
        BookingFilter::for_date(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap())
    }

    #[test]
    fn bookings_request_carries_filter_and_tenant() {
        let transport = FakeTransport::new();
        transport.respond_json(200, json!({"bookings": []}));
        let mut f = filter();
        f.consultant_id = Some("C-7".to_string());

        block_on(bookings(&transport).fetch(&f)).unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].path(), "/fetch-bookings-by-date");
        assert_eq!(
            sent[0].body,
            Some(json!({
                "date": "2025-03-14",
                "status": "Booked",
                "consultantID": "C-7",
                "pharmacyNo": TEST_PHARMACY
            }))
        );
    }

    #[test]
    fn bookings_are_normalized() {
        let transport = FakeTransport::new();
        transport.respond_json(
            200,
            json!({"bookings": [
                {"bookingID": "B1", "userName": "Ann", "mobileNo": "0712345678",
                 "vaccinationList": "V1, V2", "slot": "10:30", "meridiem": "AM",
                 "status": "Approved"},
                {"bookingID": 42}
            ]}),
        );

        let outcome = block_on(bookings(&transport).fetch(&filter())).unwrap();
        assert_eq!(outcome.notice, None);
        assert_eq!(outcome.items.len(), 2);

        let first = &outcome.items[0];
        assert_eq!(first.name, "Ann");
        assert_eq!(first.status, BookingStatus::Approved);
        assert_eq!(first.vaccine_list(), vec!["V1", "V2"]);
        assert_eq!(first.booking_date, "2025-03-14");

        let second = &outcome.items[1];
        assert_eq!(second.booking_id, "42");
        assert_eq!(second.name, "N/A");
        assert_eq!(second.status, BookingStatus::Booked);
        assert_eq!(second.pharmacy_no, TEST_PHARMACY);
    }

    #[test]
    fn sentinel_with_empty_list_is_informational() {
        let transport = FakeTransport::new();
        transport.respond_json(200, json!({"responseStatus": {"code": 1001}, "bookings": []}));

        let outcome = block_on(bookings(&transport).fetch(&filter())).unwrap();
        assert!(outcome.items.is_empty());
        let notice = outcome.notice.unwrap();
        assert_eq!(notice.severity, Severity::Info);
        assert_eq!(notice.message, NO_BOOKINGS_MESSAGE);
    }

    #[test]
    fn sentinel_message_is_preferred() {
        let transport = FakeTransport::new();
        transport.respond_json(
            200,
            json!({"responseStatus": {"code": 1001, "message": "Nothing on this day"}}),
        );

        let outcome = block_on(bookings(&transport).fetch(&filter())).unwrap();
        assert_eq!(outcome.notice.unwrap().message, "Nothing on this day");
    }

    #[test]
    fn missing_bookings_field_is_a_silent_empty_list() {
        let transport = FakeTransport::new();
        transport.respond_json(200, json!({"something": "else"}));

        let outcome = block_on(bookings(&transport).fetch(&filter())).unwrap();
        assert_eq!(outcome, FetchOutcome::empty());
    }

    #[test]
    fn network_failure_is_a_fetch_error() {
        let transport = FakeTransport::new();
        transport.fail("offline");
        let client = bookings(&transport);

        let err = block_on(client.fetch(&filter())).unwrap_err();
        assert_eq!(err, FetchError::Network("offline".to_string()));
        assert_eq!(client.failure_notice(&err), Notice::error(BOOKINGS_FETCH_FAILED));
    }

    #[test]
    fn http_error_is_a_fetch_error() {
        let transport = FakeTransport::new();
        transport.respond(502, "bad gateway");

        let err = block_on(bookings(&transport).fetch(&filter())).unwrap_err();
        assert_eq!(err, FetchError::Http { status: 502 });
    }

    #[test]
    fn vaccines_are_read_on_sentinel() {
        let transport = FakeTransport::new();
        transport.respond_json(
            200,
            json!({"responseStatus": {"code": 1001}, "vaccineList": [
                {"vaccineID": "V1", "name": "Flu", "price": 12.5, "status": "Unavailable"},
                {"name": "Hep B"}
            ]}),
        );

        let outcome = block_on(vaccines(&transport).fetch(&())).unwrap();
        assert_eq!(transport.requests()[0].body, Some(json!({"pharmacyNo": TEST_PHARMACY})));
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.items[0].price, "12.5");
        assert_eq!(outcome.items[0].status, VaccineStatus::Unavailable);
        assert_eq!(outcome.items[1].status, VaccineStatus::Available);
    }

    #[test]
    fn vaccine_rejection_is_an_error_notice_not_a_failure() {
        let transport = FakeTransport::new();
        transport.respond_json(200, json!({"responseStatus": {"code": 2001, "message": "Denied"}}));

        let outcome = block_on(vaccines(&transport).fetch(&())).unwrap();
        assert!(outcome.keep_items);
        assert_eq!(
            outcome,
            FetchOutcome::notice_only(Notice::error("Error fetching vaccines: Denied"))
        );
    }

    #[test]
    fn vaccines_without_status_are_a_silent_empty_list() {
        let transport = FakeTransport::new();
        transport.respond_json(200, json!({"vaccineList": [{"name": "Flu"}]}));

        let outcome = block_on(vaccines(&transport).fetch(&())).unwrap();
        assert_eq!(outcome, FetchOutcome::empty());
        assert!(!outcome.keep_items);
    }

    #[test]
    fn vaccine_transport_failure_names_the_cause() {
        let transport = FakeTransport::new();
        transport.fail("offline");
        let client = vaccines(&transport);

        let err = block_on(client.fetch(&())).unwrap_err();
        assert_eq!(
            client.failure_notice(&err),
            Notice::error("Error fetching vaccines: Network error: offline")
        );

        let http = FetchError::Http { status: 500 };
        assert_eq!(client.failure_notice(&http).message, "Error fetching vaccines: HTTP 500");
    }
}
