// ============================================================================
// AUTH VIEWMODEL - Login form + logout
// ============================================================================
// One submit button: the flow's stage decides whether the input is a mobile
// number or an OTP.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::AuthError;
use crate::models::Notice;
use crate::routes::{Navigator, Route};
use crate::services::{ApiClient, OtpAuthFlow, OtpStage};
use crate::stores::SessionStore;
use crate::utils::ids::IdGenerator;

pub struct AuthViewModel {
    flow: OtpAuthFlow,
    session: SessionStore,
    navigator: Rc<dyn Navigator>,
    notice: RefCell<Option<Notice>>,
}

impl AuthViewModel {
    pub fn new(
        api: ApiClient,
        session: SessionStore,
        ids: Rc<dyn IdGenerator>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        Self {
            flow: OtpAuthFlow::new(api, session.clone(), ids),
            session,
            navigator,
            notice: RefCell::new(None),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_config() -> Self {
        Self::new(
            ApiClient::from_config(),
            SessionStore::browser(),
            Rc::new(crate::utils::UuidGenerator),
            Rc::new(crate::routes::BrowserNavigator),
        )
    }

    pub fn stage(&self) -> OtpStage {
        self.flow.stage()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice.borrow().clone()
    }

    pub fn take_notice(&self) -> Option<Notice> {
        self.notice.borrow_mut().take()
    }

    fn show(&self, notice: Notice) {
        *self.notice.borrow_mut() = Some(notice);
    }

    fn report<T>(&self, result: Result<T, AuthError>) -> Result<T, AuthError> {
        if let Err(e) = &result {
            self.show(Notice::error(e.to_string()));
        }
        result
    }

    /// Mobile number or OTP, depending on the stage.
    pub async fn submit(&self, input: &str) -> Result<(), AuthError> {
        match self.flow.stage() {
            OtpStage::AwaitingMobileNumber => {
                let notice = self.report(self.flow.submit_mobile(input).await)?;
                self.show(notice);
            }
            OtpStage::AwaitingOtp { .. } => {
                let route = self.report(self.flow.submit_otp(input).await)?;
                self.notice.borrow_mut().take();
                self.navigator.push(route);
            }
        }
        Ok(())
    }

    pub async fn resend(&self) -> Result<(), AuthError> {
        let notice = self.report(self.flow.resend().await)?;
        self.show(notice);
        Ok(())
    }

    pub fn change_number(&self) {
        self.flow.change_number();
        self.notice.borrow_mut().take();
    }

    /// Clears the session and goes to the login page without a history entry.
    pub fn logout(&self) {
        self.session.logout();
        self.flow.change_number();
        self.navigator.replace(Route::Login);
    }
}
