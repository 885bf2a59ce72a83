// ViewModels: UI logic over services and caches, no rendering

pub mod auth_viewmodel;
pub mod bookings_viewmodel;
pub mod vaccines_viewmodel;

pub use auth_viewmodel::AuthViewModel;
pub use bookings_viewmodel::BookingsViewModel;
pub use vaccines_viewmodel::VaccinesViewModel;
