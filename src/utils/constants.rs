/// Response code the remote service uses for "success" (and, on the bookings
/// endpoint, for "no records for this query").
pub const SUCCESS_CODE: i64 = 1001;

// Endpoints (relative to the configured base URL)
pub const SEND_OTP_PATH: &str = "/send-otp";
pub const VERIFY_OTP_PATH: &str = "/verify-otp";
pub const FETCH_BOOKINGS_PATH: &str = "/fetch-bookings-by-date";
pub const FETCH_VACCINES_PATH: &str = "/fetch-all-vaccines";
pub const MANAGE_VACCINE_PATH: &str = "/manage-vaccine";
pub const PRESIGNED_URL_PATH: &str = "/get-presigned-url";

// Storage keys, shared by the durable and the tab-scoped store
pub const STORAGE_KEY_IS_LOGGED_IN: &str = "isLoggedIn";
pub const STORAGE_KEY_USER: &str = "user";
pub const STORAGE_KEY_CLIENT_ID: &str = "clientID";

/// Date format of `bookingDate` and of the bookings filter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
