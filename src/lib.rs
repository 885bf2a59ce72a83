// ============================================================================
// VACCINE ADMIN - Pharmacy vaccination dashboard core (Rust + WASM)
// ============================================================================
// MVVM layout:
// - ViewModels: UI logic, return values and notices
// - Services: HTTP + response interpretation
// - Stores: persisted session (localStorage / sessionStorage)
// - State: in-memory caches behind Rc<RefCell>
// - Models: wire and domain types
// ============================================================================

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod stores;
pub mod utils;
pub mod viewmodels;

#[cfg(test)]
mod test_support;

pub use config::{AppConfig, CONFIG};
pub use error::{ApiError, AuthError, FetchError, MutationError, StorageError, ValidationError};

#[cfg(target_arch = "wasm32")]
mod entry {
    use std::fmt::Display;
    use std::rc::Rc;

    use serde::Serialize;
    use wasm_bindgen::prelude::*;

    use crate::config::CONFIG;
    use crate::models::{BookingFilter, VaccineForm};
    use crate::routes::{BrowserNavigator, Route, RouteGuard};
    use crate::services::PictureFile;
    use crate::stores::SessionStore;
    use crate::viewmodels::{AuthViewModel, BookingsViewModel, VaccinesViewModel};

    // View state lives as long as the page
    thread_local! {
        static AUTH: Rc<AuthViewModel> = Rc::new(AuthViewModel::from_config());
        static BOOKINGS: Rc<BookingsViewModel> = Rc::new(BookingsViewModel::from_config());
        static VACCINES: Rc<VaccinesViewModel> = Rc::new(VaccinesViewModel::from_config());
    }

    fn js_error(err: impl Display) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
    }

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let level = if CONFIG.is_logging_enabled() {
            log::Level::Debug
        } else {
            log::Level::Warn
        };
        wasm_logger::init(wasm_logger::Config::new(level));
        log::info!(
            "🚀 Vaccine admin starting ({}, {})",
            CONFIG.environment,
            CONFIG.backend_url
        );

        if let Some(route) = BrowserNavigator::current_route() {
            guard(route);
        }
        Ok(())
    }

    fn guard(route: Route) -> bool {
        RouteGuard::new(SessionStore::browser()).enforce(route, &BrowserNavigator)
    }

    /// Called by the page on every navigation. Returns whether `path` may render.
    #[wasm_bindgen(js_name = guardRoute)]
    pub fn guard_route(path: &str) -> bool {
        match Route::from_path(path) {
            Some(route) => guard(route),
            None => {
                log::warn!("⚠️ Unknown route {}", path);
                false
            }
        }
    }

    #[wasm_bindgen(js_name = isAuthenticated)]
    pub fn is_authenticated() -> bool {
        SessionStore::browser().is_authenticated()
    }

    /// Login form submit (mobile number, then OTP). Resolves to the notice
    /// text to show, rejects with the error text.
    #[wasm_bindgen(js_name = submitLogin)]
    pub async fn submit_login(input: String) -> Result<JsValue, JsValue> {
        let vm = AUTH.with(Rc::clone);
        vm.submit(&input)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(vm
            .take_notice()
            .map(|notice| JsValue::from_str(&notice.message))
            .unwrap_or(JsValue::NULL))
    }

    #[wasm_bindgen(js_name = changeNumber)]
    pub fn change_number() {
        AUTH.with(|vm| vm.change_number());
    }

    #[wasm_bindgen]
    pub fn logout() {
        AUTH.with(|vm| vm.logout());
    }

    // ------------------------------------------------------------------------
    // Bookings
    // ------------------------------------------------------------------------
    // List calls resolve to `{items, notice, isLoading, error}`. A failed fetch
    // still resolves; the failure is in `notice` and `error`.

    #[wasm_bindgen(js_name = bookingsState)]
    pub fn bookings_state() -> Result<JsValue, JsValue> {
        BOOKINGS.with(|vm| to_js(&vm.state().snapshot()))
    }

    #[wasm_bindgen(js_name = refreshBookings)]
    pub async fn refresh_bookings() -> Result<JsValue, JsValue> {
        let vm = BOOKINGS.with(Rc::clone);
        let _ = vm.refresh().await;
        to_js(&vm.state().snapshot())
    }

    /// Search form submit. Rejects on a malformed date or status.
    #[wasm_bindgen(js_name = setBookingFilter)]
    pub async fn set_booking_filter(
        date: String,
        status: Option<String>,
        consultant_id: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let filter = BookingFilter::parse(&date, status.as_deref(), consultant_id.as_deref())
            .map_err(js_error)?;
        let vm = BOOKINGS.with(Rc::clone);
        let _ = vm.set_filter(filter).await;
        to_js(&vm.state().snapshot())
    }

    #[wasm_bindgen(js_name = approveBooking)]
    pub fn approve_booking(booking_id: &str) -> Result<JsValue, JsValue> {
        BOOKINGS.with(|vm| {
            vm.approve(booking_id).map_err(js_error)?;
            to_js(&vm.state().snapshot())
        })
    }

    #[wasm_bindgen(js_name = cancelBooking)]
    pub fn cancel_booking(booking_id: &str) -> Result<JsValue, JsValue> {
        BOOKINGS.with(|vm| {
            vm.cancel(booking_id).map_err(js_error)?;
            to_js(&vm.state().snapshot())
        })
    }

    // ------------------------------------------------------------------------
    // Vaccines
    // ------------------------------------------------------------------------

    #[wasm_bindgen(js_name = vaccinesState)]
    pub fn vaccines_state() -> Result<JsValue, JsValue> {
        VACCINES.with(|vm| to_js(&vm.state().snapshot()))
    }

    #[wasm_bindgen(js_name = refreshVaccines)]
    pub async fn refresh_vaccines() -> Result<JsValue, JsValue> {
        let vm = VACCINES.with(Rc::clone);
        let _ = vm.refresh().await;
        to_js(&vm.state().snapshot())
    }

    /// Dialog submit. `original_name` is set when editing an existing entry.
    #[wasm_bindgen(js_name = saveVaccine)]
    pub async fn save_vaccine(
        original_name: Option<String>,
        form: JsValue,
    ) -> Result<JsValue, JsValue> {
        let form: VaccineForm = serde_wasm_bindgen::from_value(form)?;
        let vm = VACCINES.with(Rc::clone);
        let original = original_name
            .map(|name| {
                vm.find(&name)
                    .ok_or_else(|| js_error(format!("Vaccine {} is not in the current list", name)))
            })
            .transpose()?;
        vm.save(original.as_ref(), &form).await.map_err(js_error)?;
        to_js(&vm.state().snapshot())
    }

    #[wasm_bindgen(js_name = toggleVaccineStatus)]
    pub async fn toggle_vaccine_status(name: String) -> Result<JsValue, JsValue> {
        let vm = VACCINES.with(Rc::clone);
        let vaccine = vm
            .find(&name)
            .ok_or_else(|| js_error(format!("Vaccine {} is not in the current list", name)))?;
        vm.toggle_status(&vaccine).await.map_err(js_error)?;
        to_js(&vm.state().snapshot())
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct PictureResult {
        form: VaccineForm,
        /// Set when the PUT failed; `form.pictureUrl` is filled in regardless.
        upload_error: Option<String>,
    }

    /// Uploads the picked file. Resolves to `{form, uploadError}`.
    #[wasm_bindgen(js_name = uploadVaccinePicture)]
    pub async fn upload_vaccine_picture(
        form: JsValue,
        bytes: Vec<u8>,
        mime_type: String,
    ) -> Result<JsValue, JsValue> {
        let mut form: VaccineForm = serde_wasm_bindgen::from_value(form)?;
        let file = PictureFile { bytes, mime_type };
        let vm = VACCINES.with(Rc::clone);
        let upload = vm.upload_picture(&mut form, &file).await.map_err(js_error)?;
        to_js(&PictureResult {
            form,
            upload_error: upload.outcome.err().map(|e| e.to_string()),
        })
    }
}
