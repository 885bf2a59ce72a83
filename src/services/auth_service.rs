// ============================================================================
// AUTH SERVICE - Two-step OTP login
// ============================================================================
// AwaitingMobileNumber --submit_mobile--> AwaitingOtp --submit_otp--> logged in
//
// The clientID returned by send-otp is kept in durable storage until the OTP
// is verified, so a failed verification can simply be retried.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::AuthError;
use crate::models::{Notice, SendOtpRequest, User, VerifyOtpRequest};
use crate::routes::Route;
use crate::services::api_client::ApiClient;
use crate::stores::SessionStore;
use crate::utils::ids::IdGenerator;
use crate::utils::validation::{mask_mobile, validate_mobile_no, validate_otp};

pub const OTP_SENT_MESSAGE: &str = "OTP sent successfully!";

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum OtpStage {
    #[default]
    AwaitingMobileNumber,
    AwaitingOtp { mobile_no: String },
}

pub struct OtpAuthFlow {
    api: ApiClient,
    session: SessionStore,
    ids: Rc<dyn IdGenerator>,
    stage: RefCell<OtpStage>,
}

impl OtpAuthFlow {
    pub fn new(api: ApiClient, session: SessionStore, ids: Rc<dyn IdGenerator>) -> Self {
        Self {
            api,
            session,
            ids,
            stage: RefCell::new(OtpStage::default()),
        }
    }

    pub fn stage(&self) -> OtpStage {
        self.stage.borrow().clone()
    }

    fn pending_mobile(&self) -> Option<String> {
        match &*self.stage.borrow() {
            OtpStage::AwaitingOtp { mobile_no } => Some(mobile_no.clone()),
            OtpStage::AwaitingMobileNumber => None,
        }
    }

    /// Validates the number and requests an OTP for it.
    pub async fn submit_mobile(&self, mobile_no: &str) -> Result<Notice, AuthError> {
        if self.pending_mobile().is_some() {
            return Err(AuthError::InvalidState("an OTP is pending"));
        }
        let mobile_no = mobile_no.trim();
        validate_mobile_no(mobile_no)?;
        self.request_otp(mobile_no).await
    }

    /// Requests a fresh OTP for the pending number. The new clientID
    /// overwrites the stored one.
    pub async fn resend(&self) -> Result<Notice, AuthError> {
        let mobile_no = self
            .pending_mobile()
            .ok_or(AuthError::InvalidState("no mobile number was submitted"))?;
        self.request_otp(&mobile_no).await
    }

    async fn request_otp(&self, mobile_no: &str) -> Result<Notice, AuthError> {
        let request = SendOtpRequest {
            mobile_no: mobile_no.to_string(),
            device_id: self.ids.next_id(),
        };
        log::info!("📲 Requesting OTP for {}", mask_mobile(mobile_no));

        let response = self.api.send_otp(&request).await.map_err(|e| {
            log::error!("❌ OTP request failed: {}", e);
            AuthError::SendOtpFailed(e)
        })?;
        self.session.set_client_id(&response.client_id)?;

        *self.stage.borrow_mut() = OtpStage::AwaitingOtp {
            mobile_no: mobile_no.to_string(),
        };
        log::info!("✅ OTP sent");
        Ok(Notice::success(OTP_SENT_MESSAGE))
    }

    /// Verifies the OTP and logs in. Returns the route to open next.
    pub async fn submit_otp(&self, otp: &str) -> Result<Route, AuthError> {
        let mobile_no = self
            .pending_mobile()
            .ok_or(AuthError::InvalidState("no OTP was requested"))?;
        let otp = otp.trim();
        validate_otp(otp)?;
        let client_id = self.session.client_id().ok_or(AuthError::MissingClientId)?;

        let request = VerifyOtpRequest {
            mobile_no: mobile_no.clone(),
            otp: otp.to_string(),
            client_id,
        };
        self.api.verify_otp(&request).await.map_err(|e| {
            log::warn!("⚠️ OTP verification failed for {}: {}", mask_mobile(&mobile_no), e);
            AuthError::InvalidOtp(e)
        })?;

        self.session.login(&User::new(mobile_no.clone()))?;
        self.session.clear_client_id();
        *self.stage.borrow_mut() = OtpStage::AwaitingMobileNumber;
        log::info!("🔐 Logged in as {}", mask_mobile(&mobile_no));
        Ok(Route::Dashboard)
    }

    /// Back to number entry. The stored clientID is left in place.
    pub fn change_number(&self) {
        *self.stage.borrow_mut() = OtpStage::AwaitingMobileNumber;
    }
}
