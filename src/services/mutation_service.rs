// ============================================================================
// MUTATION SERVICE - Vaccine commands, picture upload, booking actions
// ============================================================================
// Vaccine changes are sent as {action, vaccine} commands and judged by the
// response code only. Callers re-fetch afterwards; nothing returned here is
// merged into the cache.
// ============================================================================

use std::rc::Rc;

use crate::error::{MutationError, ValidationError, GENERIC_REMOTE_ERROR};
use crate::models::{
    Booking, BookingAction, Notice, PresignedUrlRequest, ResponseEnvelope, Vaccine, VaccineAction,
    VaccineCommand, VaccineForm, VaccineStatus,
};
use crate::services::api_client::ApiClient;
use crate::utils::ids::IdGenerator;

/// File picked in the vaccine dialog.
#[derive(Clone, Debug, PartialEq)]
pub struct PictureFile {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl PictureFile {
    /// `image/png` → `png`, `image/svg+xml` → `svg`.
    pub fn extension(&self) -> &str {
        self.mime_type
            .split_once('/')
            .map(|(_, subtype)| subtype.split('+').next().unwrap_or(subtype))
            .filter(|ext| !ext.is_empty())
            .unwrap_or("bin")
    }
}

/// Result of a picture upload. `picture_url` is the generated object key and
/// is returned even when the upload itself failed.
#[derive(Clone, Debug, PartialEq)]
pub struct PictureUpload {
    pub picture_url: String,
    pub outcome: Result<(), MutationError>,
}

pub struct MutationService {
    api: ApiClient,
    pharmacy_no: String,
    upload_object_type: String,
    ids: Rc<dyn IdGenerator>,
}

fn check_envelope(envelope: ResponseEnvelope) -> Result<(), MutationError> {
    let status = envelope.response_status.unwrap_or_default();
    if status.is_success() {
        return Ok(());
    }
    Err(MutationError::RemoteRejection {
        code: status.code,
        message: status
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_REMOTE_ERROR.to_string()),
    })
}

impl MutationService {
    pub fn new(
        api: ApiClient,
        pharmacy_no: impl Into<String>,
        upload_object_type: impl Into<String>,
        ids: Rc<dyn IdGenerator>,
    ) -> Self {
        Self {
            api,
            pharmacy_no: pharmacy_no.into(),
            upload_object_type: upload_object_type.into(),
            ids,
        }
    }

    async fn send(&self, command: &VaccineCommand) -> Result<(), MutationError> {
        let envelope = self.api.manage_vaccine(command).await?;
        check_envelope(envelope)
    }

    /// ADD when `original` is `None`, UPDATE otherwise.
    pub async fn save_vaccine(
        &self,
        original: Option<&Vaccine>,
        form: &VaccineForm,
    ) -> Result<VaccineAction, MutationError> {
        form.validate()?;
        let command = match original {
            None => VaccineCommand::add(form, &self.pharmacy_no),
            Some(original) => VaccineCommand::update(original, form, &self.pharmacy_no),
        };
        log::info!("💉 {:?} vaccine '{}'", command.action, command.vaccine.name);

        self.send(&command).await.map_err(|e| {
            log::error!("❌ {:?} vaccine failed: {}", command.action, e);
            e
        })?;
        Ok(command.action)
    }

    pub async fn set_vaccine_status(
        &self,
        vaccine: &Vaccine,
        status: VaccineStatus,
    ) -> Result<(), MutationError> {
        let command = VaccineCommand::set_status(vaccine, status, &self.pharmacy_no);
        log::info!("🔁 Vaccine '{}' → {}", vaccine.name, status);
        self.send(&command).await
    }

    /// Presign, then PUT. The two steps run one after the other, no retry.
    pub async fn upload_picture(&self, file: &PictureFile) -> Result<PictureUpload, MutationError> {
        if file.bytes.is_empty() {
            return Err(ValidationError::EmptyFile.into());
        }
        let key = format!("{}.{}", self.ids.next_id(), file.extension());
        let outcome = self.presign_and_put(&key, file).await;
        match &outcome {
            Ok(()) => log::info!("🖼️ Uploaded picture {}", key),
            Err(e) => log::error!("❌ Picture upload {} failed: {}", key, e),
        }
        Ok(PictureUpload {
            picture_url: key,
            outcome,
        })
    }

    async fn presign_and_put(&self, key: &str, file: &PictureFile) -> Result<(), MutationError> {
        let request = PresignedUrlRequest {
            object_type: self.upload_object_type.clone(),
            mime_type: file.mime_type.clone(),
            key: key.to_string(),
        };
        let presigned = self.api.get_presigned_url(&request).await?;
        if !presigned.is_success() {
            let status = presigned.response.unwrap_or_default();
            return Err(MutationError::RemoteRejection {
                code: status.response_code,
                message: status
                    .message
                    .unwrap_or_else(|| GENERIC_REMOTE_ERROR.to_string()),
            });
        }
        let url = presigned
            .url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| MutationError::RemoteRejection {
                code: None,
                message: GENERIC_REMOTE_ERROR.to_string(),
            })?;
        self.api.upload(&url, &file.mime_type, &file.bytes).await?;
        Ok(())
    }
}

/// Local-only approve/cancel: flips the status in place. Nothing is sent.
pub fn apply_booking_action(
    bookings: &mut [Booking],
    booking_id: &str,
    action: BookingAction,
) -> Result<Notice, MutationError> {
    let booking = bookings
        .iter_mut()
        .find(|b| b.booking_id == booking_id)
        .ok_or_else(|| MutationError::UnknownBooking(booking_id.to_string()))?;

    let allowed = match action {
        BookingAction::Approve => booking.status.can_approve(),
        BookingAction::Cancel => booking.status.can_cancel(),
    };
    if !allowed {
        return Err(MutationError::InvalidTransition(booking.status.to_string()));
    }

    booking.status = action.target_status();
    log::info!("📋 Booking {} {} (local only)", booking_id, action.past_tense());
    Ok(Notice::success(format!(
        "Booking successfully {}",
        action.past_tense()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, RawBooking};
    use crate::test_support::{FakeTransport, SequentialIds, TEST_BASE_URL, TEST_PHARMACY};
    use futures::executor::block_on;
    use serde_json::json;

    fn service(transport: &FakeTransport) -> MutationService {
        let api = ApiClient::new(TEST_BASE_URL, Rc::new(transport.clone()));
        MutationService::new(api, TEST_PHARMACY, "vaccine", Rc::new(SequentialIds::default()))
    }

    fn flu() -> Vaccine {
        Vaccine {
            vaccine_id: Some("V1".to_string()),
            name: "Flu".to_string(),
            compositions: "Inactivated".to_string(),
            description: "Seasonal".to_string(),
            price: "12.50".to_string(),
            picture_url: "a.png".to_string(),
            status: VaccineStatus::Available,
            pharmacy_no: TEST_PHARMACY.to_string(),
        }
    }

    fn ok() -> serde_json::Value {
        json!({"responseStatus": {"code": 1001, "message": "ok"}})
    }

    #[test]
    fn rename_keeps_original_name_and_sends_new_name() {
        let transport = FakeTransport::new();
        transport.respond_json(200, ok());
        let mut form = VaccineForm::from_vaccine(&flu());
        form.name = "Flu Quadrivalent".to_string();

        let action = block_on(service(&transport).save_vaccine(Some(&flu()), &form)).unwrap();

        assert_eq!(action, VaccineAction::Update);
        let sent = transport.requests();
        assert_eq!(sent[0].path(), "/manage-vaccine");
        let body = sent[0].body.as_ref().unwrap();
        assert_eq!(body["action"], "UPDATE");
        assert_eq!(body["vaccine"]["name"], "Flu");
        assert_eq!(body["vaccine"]["newName"], "Flu Quadrivalent");
        assert_eq!(body["vaccine"]["vaccineID"], "V1");
    }

    #[test]
    fn add_sends_full_payload() {
        let transport = FakeTransport::new();
        transport.respond_json(200, ok());
        let form = VaccineForm::from_vaccine(&flu());

        let action = block_on(service(&transport).save_vaccine(None, &form)).unwrap();

        assert_eq!(action, VaccineAction::Add);
        assert_eq!(
            transport.requests()[0].body,
            Some(json!({
                "action": "ADD",
                "vaccine": {
                    "name": "Flu",
                    "compositions": "Inactivated",
                    "description": "Seasonal",
                    "price": "12.50",
                    "pictureUrl": "a.png",
                    "status": "Available",
                    "pharmacyNo": TEST_PHARMACY
                }
            }))
        );
    }

    #[test]
    fn invalid_form_is_not_sent() {
        let transport = FakeTransport::new();
        let mut form = VaccineForm::from_vaccine(&flu());
        form.price = "12,50".to_string();

        let err = block_on(service(&transport).save_vaccine(None, &form)).unwrap_err();
        assert_eq!(err, MutationError::Validation(ValidationError::InvalidPrice));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn non_sentinel_code_is_a_rejection_with_remote_message() {
        let transport = FakeTransport::new();
        transport.respond_json(
            200,
            json!({"responseStatus": {"code": 2002, "message": "Duplicate"}}),
        );
        transport.respond_json(200, json!({"responseStatus": {"code": 2002}}));
        let service = service(&transport);
        let form = VaccineForm::from_vaccine(&flu());

        assert_eq!(
            block_on(service.save_vaccine(None, &form)),
            Err(MutationError::RemoteRejection {
                code: Some(2002),
                message: "Duplicate".to_string()
            })
        );
        let err = block_on(service.save_vaccine(None, &form)).unwrap_err();
        assert_eq!(err.to_string(), GENERIC_REMOTE_ERROR);
    }

    #[test]
    fn http_error_body_message_is_surfaced() {
        let transport = FakeTransport::new();
        transport.respond(400, r#"{"responseStatus":{"code":2003,"message":"Bad price"}}"#);

        let service = service(&transport);
        let err = block_on(service.set_vaccine_status(&flu(), VaccineStatus::Unavailable))
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad price");
    }

    #[test]
    fn status_toggle_sends_minimal_payload() {
        let transport = FakeTransport::new();
        transport.respond_json(200, ok());

        let service = service(&transport);
        block_on(service.set_vaccine_status(&flu(), VaccineStatus::Unavailable)).unwrap();
        assert_eq!(
            transport.requests()[0].body,
            Some(json!({
                "action": "UPDATE",
                "vaccine": {
                    "name": "Flu",
                    "status": "Unavailable",
                    "pharmacyNo": TEST_PHARMACY,
                    "vaccineID": "V1"
                }
            }))
        );
    }

    #[test]
    fn picture_upload_presigns_then_puts() {
        let transport = FakeTransport::new();
        transport.respond_json(
            200,
            json!({"response": {"responseCode": 1001}, "url": "https://bucket.test/put"}),
        );
        transport.respond(200, "");
        let file = PictureFile {
            bytes: vec![9, 9],
            mime_type: "image/png".to_string(),
        };

        let upload = block_on(service(&transport).upload_picture(&file)).unwrap();

        assert_eq!(upload.picture_url, "id-1.png");
        assert_eq!(upload.outcome, Ok(()));
        let sent = transport.requests();
        assert_eq!(
            sent[0].body,
            Some(json!({"type": "vaccine", "mimeType": "image/png", "key": "id-1.png"}))
        );
        assert_eq!(sent[1].method, "PUT");
        assert_eq!(sent[1].url, "https://bucket.test/put");
    }

    #[test]
    fn failed_upload_still_returns_the_key() {
        let transport = FakeTransport::new();
        transport.respond_json(
            200,
            json!({"response": {"responseCode": 1001}, "url": "https://bucket.test/put"}),
        );
        transport.respond(403, "expired");
        let file = PictureFile {
            bytes: vec![1],
            mime_type: "image/jpeg".to_string(),
        };

        let upload = block_on(service(&transport).upload_picture(&file)).unwrap();
        assert_eq!(upload.picture_url, "id-1.jpeg");
        assert!(upload.outcome.is_err());
    }

    #[test]
    fn empty_picture_is_rejected_before_presign() {
        let transport = FakeTransport::new();
        let file = PictureFile {
            bytes: Vec::new(),
            mime_type: "image/png".to_string(),
        };
        assert_eq!(
            block_on(service(&transport).upload_picture(&file)),
            Err(MutationError::Validation(ValidationError::EmptyFile))
        );
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn extension_comes_from_mime_subtype() {
        let file = |mime: &str| PictureFile {
            bytes: vec![1],
            mime_type: mime.to_string(),
        };
        assert_eq!(file("image/svg+xml").extension(), "svg");
        assert_eq!(file("image/webp").extension(), "webp");
        assert_eq!(file("garbage").extension(), "bin");
    }

    fn booking(id: &str, status: &str) -> Booking {
        RawBooking {
            booking_id: Some(id.to_string()),
            status: Some(status.to_string()),
            ..RawBooking::default()
        }
        .normalize("2025-03-14", TEST_PHARMACY)
    }

    #[test]
    fn booking_actions_patch_locally() {
        let mut list = vec![booking("B1", "Booked"), booking("B2", "Booked")];

        let notice = apply_booking_action(&mut list, "B2", BookingAction::Approve).unwrap();
        assert_eq!(notice, Notice::success("Booking successfully approved"));
        assert_eq!(list[1].status, BookingStatus::Approved);
        assert_eq!(list[0].status, BookingStatus::Booked);

        apply_booking_action(&mut list, "B2", BookingAction::Cancel).unwrap();
        assert_eq!(list[1].status, BookingStatus::Cancelled);
    }

    #[test]
    fn disallowed_booking_transitions_are_rejected() {
        let mut list = vec![booking("B1", "Cancelled"), booking("B2", "Approved")];

        assert_eq!(
            apply_booking_action(&mut list, "B1", BookingAction::Cancel),
            Err(MutationError::InvalidTransition("Cancelled".to_string()))
        );
        assert!(apply_booking_action(&mut list, "B2", BookingAction::Approve).is_err());
        assert_eq!(
            apply_booking_action(&mut list, "B9", BookingAction::Cancel),
            Err(MutationError::UnknownBooking("B9".to_string()))
        );
    }
}
