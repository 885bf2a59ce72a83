// ============================================================================
// VACCINES VIEWMODEL - Catalog list, add/edit dialog, availability switch
// ============================================================================
// Every successful mutation is followed by a full re-fetch.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{FetchError, MutationError};
use crate::models::{Notice, Vaccine, VaccineAction, VaccineForm};
use crate::services::{
    ApiClient, CollectionClient, MutationService, PictureFile, PictureUpload, VaccinesSource,
};
use crate::state::{CollectionState, SyncPolicy};
use crate::utils::ids::IdGenerator;

fn verb(action: VaccineAction) -> &'static str {
    match action {
        VaccineAction::Add => "add",
        VaccineAction::Update => "update",
    }
}

fn past(action: VaccineAction) -> &'static str {
    match action {
        VaccineAction::Add => "added",
        VaccineAction::Update => "updated",
    }
}

pub struct VaccinesViewModel {
    client: CollectionClient<VaccinesSource>,
    mutations: MutationService,
    state: CollectionState<Vaccine>,
    saving: Cell<bool>,
    uploading: Cell<bool>,
}

impl VaccinesViewModel {
    pub fn new(
        api: ApiClient,
        pharmacy_no: &str,
        upload_object_type: &str,
        ids: Rc<dyn IdGenerator>,
    ) -> Self {
        Self {
            client: CollectionClient::new(api.clone(), VaccinesSource::new(pharmacy_no)),
            mutations: MutationService::new(api, pharmacy_no, upload_object_type, ids),
            state: CollectionState::new(SyncPolicy::default()),
            saving: Cell::new(false),
            uploading: Cell::new(false),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_config() -> Self {
        let config = &*crate::config::CONFIG;
        Self::new(
            ApiClient::from_config(),
            &config.pharmacy_no,
            &config.upload_object_type,
            Rc::new(crate::utils::UuidGenerator),
        )
    }

    pub fn state(&self) -> &CollectionState<Vaccine> {
        &self.state
    }

    /// Cached entry by its current name.
    pub fn find(&self, name: &str) -> Option<Vaccine> {
        self.state.items().into_iter().find(|v| v.name == name)
    }

    pub fn is_saving(&self) -> bool {
        self.saving.get()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.get()
    }

    pub async fn refresh(&self) -> Result<(), FetchError> {
        let ticket = self.state.begin_fetch();
        match self.client.fetch(&()).await {
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

    /// Re-fetch after a mutation. A notice from the fetch replaces `notice`.
    async fn reconcile(&self, notice: Notice) {
        if let Err(e) = self.refresh().await {
            log::warn!("⚠️ Re-fetch after mutation failed: {}", e);
        }
        if self.state.notice().is_none() {
            self.state.set_notice(notice);
        }
    }

    /// Submits the dialog. `original` is the entry being edited, if any.
    pub async fn save(
        &self,
        original: Option<&Vaccine>,
        form: &VaccineForm,
    ) -> Result<Notice, MutationError> {
        let action = if original.is_some() {
            VaccineAction::Update
        } else {
            VaccineAction::Add
        };
        self.saving.set(true);
        let result = self.mutations.save_vaccine(original, form).await;
        self.saving.set(false);

        match result {
            Ok(action) => {
                let notice = Notice::success(format!("Vaccine {} successfully!", past(action)));
                self.reconcile(notice.clone()).await;
                Ok(notice)
            }
            Err(e) => {
                let message = match &e {
                    MutationError::Validation(v) => v.to_string(),
                    other => format!("Failed to {} vaccine: {}", verb(action), other),
                };
                self.state.set_notice(Notice::error(message));
                Err(e)
            }
        }
    }

    /// Flips Available/Unavailable.
    pub async fn toggle_status(&self, vaccine: &Vaccine) -> Result<Notice, MutationError> {
        let target = vaccine.status.toggled();
        match self.mutations.set_vaccine_status(vaccine, target).await {
            Ok(()) => {
                let notice = Notice::success("Vaccine status updated successfully!");
                self.reconcile(notice.clone()).await;
                Ok(notice)
            }
            Err(e) => {
                self.state
                    .set_notice(Notice::error(format!("Failed to update vaccine status: {}", e)));
                Err(e)
            }
        }
    }

    /// Uploads the picked file and writes the object key into the form.
    pub async fn upload_picture(
        &self,
        form: &mut VaccineForm,
        file: &PictureFile,
    ) -> Result<PictureUpload, MutationError> {
        self.uploading.set(true);
        let result = self.mutations.upload_picture(file).await;
        self.uploading.set(false);

        let upload = result?;
        form.picture_url = upload.picture_url.clone();
        Ok(upload)
    }
}
