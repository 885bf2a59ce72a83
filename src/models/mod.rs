pub mod api;
pub mod booking;
pub mod notice;
pub mod session;
pub mod vaccine;

pub use api::{
    FetchBookingsRequest, FetchVaccinesRequest, PresignedUrlRequest, PresignedUrlResponse,
    ResponseEnvelope, ResponseStatus, SendOtpRequest, SendOtpResponse, VerifyOtpRequest,
};
pub use booking::{Booking, BookingAction, BookingFilter, BookingStatus, Meridiem, RawBooking};
pub use notice::{Notice, Severity};
pub use session::{Session, StorageScope, User};
pub use vaccine::{
    RawVaccine, Vaccine, VaccineAction, VaccineCommand, VaccineForm, VaccinePayload, VaccineStatus,
};
