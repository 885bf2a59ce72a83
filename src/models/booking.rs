use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::models::api::lenient_string;
use crate::utils::constants::DATE_FORMAT;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug, Default)]
pub enum BookingStatus {
    #[default]
    Booked,
    Approved,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Booked => "Booked",
            BookingStatus::Approved => "Approved",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Completed => "Completed",
        }
    }

    /// Case-insensitive; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "booked" => Some(BookingStatus::Booked),
            "approved" => Some(BookingStatus::Approved),
            "cancelled" | "canceled" => Some(BookingStatus::Cancelled),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }

    pub fn can_approve(&self) -> bool {
        !matches!(self, BookingStatus::Approved | BookingStatus::Cancelled)
    }

    pub fn can_cancel(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub enum Meridiem {
    #[default]
    AM,
    PM,
}

impl Meridiem {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AM" => Some(Meridiem::AM),
            "PM" => Some(Meridiem::PM),
            _ => None,
        }
    }
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meridiem::AM => f.write_str("AM"),
            Meridiem::PM => f.write_str("PM"),
        }
    }
}

/// Booking as shown in the dashboard, after normalization.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: String,
    pub name: String,
    pub phone_number: String,
    /// Comma-joined vaccine ids, as sent by the service.
    pub vaccine_ids: String,
    pub booking_date: String,
    pub slot: String,
    pub meridiem: Meridiem,
    pub payment_method: String,
    pub status: BookingStatus,
    pub user_id: String,
    pub pharmacy_no: String,
    #[serde(rename = "type")]
    pub booking_type: String,
    pub consultation_type: String,
}

impl Booking {
    /// Individual vaccine ids, trimmed, blanks dropped.
    pub fn vaccine_list(&self) -> Vec<String> {
        self.vaccine_ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Slot with its meridiem, e.g. `10:30 AM`.
    pub fn time_slot(&self) -> String {
        format!("{} {}", self.slot, self.meridiem).trim().to_string()
    }
}

/// Booking exactly as the service returns it. Every field is optional.
#[derive(Clone, PartialEq, Deserialize, Debug, Default)]
pub struct RawBooking {
    #[serde(rename = "bookingID", default, deserialize_with = "lenient_string")]
    pub booking_id: Option<String>,
    #[serde(rename = "userName", default, deserialize_with = "lenient_string")]
    pub user_name: Option<String>,
    #[serde(rename = "mobileNo", default, deserialize_with = "lenient_string")]
    pub mobile_no: Option<String>,
    #[serde(rename = "vaccinationList", default, deserialize_with = "lenient_string")]
    pub vaccination_list: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slot: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub meridiem: Option<String>,
    #[serde(rename = "paymentMethod", default, deserialize_with = "lenient_string")]
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(rename = "userID", default, deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    #[serde(rename = "consultantID", default, deserialize_with = "lenient_string")]
    pub consultant_id: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub booking_type: Option<String>,
    #[serde(rename = "consultationType", default, deserialize_with = "lenient_string")]
    pub consultation_type: Option<String>,
}

const NOT_AVAILABLE: &str = "N/A";

/// Empty strings count as missing, like the JS `||` defaults.
fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl RawBooking {
    /// Fills defaults for optional fields. `booking_id` passes through as-is.
    pub fn normalize(self, fallback_date: &str, pharmacy_no: &str) -> Booking {
        let status = match self.status.as_deref().filter(|s| !s.is_empty()) {
            None => BookingStatus::Booked,
            Some(raw) => BookingStatus::parse(raw).unwrap_or_else(|| {
                log::warn!("⚠️ Unknown booking status '{}', treating as Booked", raw);
                BookingStatus::Booked
            }),
        };
        let meridiem = self
            .meridiem
            .as_deref()
            .and_then(Meridiem::parse)
            .unwrap_or_default();

        Booking {
            booking_id: self.booking_id.unwrap_or_default(),
            name: or_default(self.user_name, NOT_AVAILABLE),
            phone_number: or_default(self.mobile_no, NOT_AVAILABLE),
            vaccine_ids: self.vaccination_list.unwrap_or_default(),
            booking_date: or_default(self.date, fallback_date),
            slot: self.slot.unwrap_or_default(),
            meridiem,
            payment_method: or_default(self.payment_method, NOT_AVAILABLE),
            status,
            user_id: self.user_id.unwrap_or_default(),
            pharmacy_no: or_default(self.consultant_id, pharmacy_no),
            booking_type: self.booking_type.unwrap_or_default(),
            consultation_type: self.consultation_type.unwrap_or_default(),
        }
    }
}

/// Search filter of the bookings view.
#[derive(Clone, PartialEq, Debug)]
pub struct BookingFilter {
    pub date: NaiveDate,
    pub status: Option<BookingStatus>,
    pub consultant_id: Option<String>,
}

impl BookingFilter {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            status: Some(BookingStatus::Booked),
            consultant_id: None,
        }
    }

    /// Filter from the search form. Blank status or consultant means "any".
    pub fn parse(
        date: &str,
        status: Option<&str>,
        consultant_id: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidDate)?;
        let status = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                BookingStatus::parse(s).ok_or_else(|| ValidationError::InvalidStatus(s.to_string()))
            })
            .transpose()?;
        let consultant_id = consultant_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        Ok(Self {
            date,
            status,
            consultant_id,
        })
    }

    /// Today's booked appointments, the view's initial query.
    pub fn today() -> Self {
        Self::for_date(chrono::Local::now().date_naive())
    }

    pub fn formatted_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Local-only booking actions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BookingAction {
    Approve,
    Cancel,
}

impl BookingAction {
    pub fn target_status(&self) -> BookingStatus {
        match self {
            BookingAction::Approve => BookingStatus::Approved,
            BookingAction::Cancel => BookingStatus::Cancelled,
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            BookingAction::Approve => "approved",
            BookingAction::Cancel => "cancelled",
        }
    }
}
