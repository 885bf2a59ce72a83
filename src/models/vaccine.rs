use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::models::api::lenient_string;

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub enum VaccineStatus {
    #[default]
    Available,
    Unavailable,
}

impl VaccineStatus {
    /// Missing or unrecognised values are treated as `Unavailable`, except an
    /// absent field which defaults to `Available`.
    fn from_raw(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            None => VaccineStatus::Available,
            Some(v) if v.is_empty() || v == "available" => VaccineStatus::Available,
            Some(v) => {
                if v != "unavailable" {
                    log::warn!("⚠️ Unknown vaccine status '{}', treating as Unavailable", v);
                }
                VaccineStatus::Unavailable
            }
        }
    }

    /// Value the availability switch flips to.
    pub fn toggled(&self) -> Self {
        match self {
            VaccineStatus::Available => VaccineStatus::Unavailable,
            VaccineStatus::Unavailable => VaccineStatus::Available,
        }
    }
}

impl fmt::Display for VaccineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaccineStatus::Available => f.write_str("Available"),
            VaccineStatus::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// Catalog entry. `name` is the key the service addresses vaccines by.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Vaccine {
    #[serde(rename = "vaccineID", default, skip_serializing_if = "Option::is_none")]
    pub vaccine_id: Option<String>,
    pub name: String,
    pub compositions: String,
    pub description: String,
    /// Decimal price, kept as the string the service sends.
    pub price: String,
    pub picture_url: String,
    pub status: VaccineStatus,
    pub pharmacy_no: String,
}

#[derive(Clone, PartialEq, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawVaccine {
    #[serde(rename = "vaccineID", default, deserialize_with = "lenient_string")]
    pub vaccine_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub compositions: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub picture_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pharmacy_no: Option<String>,
}

impl RawVaccine {
    pub fn normalize(self, pharmacy_no: &str) -> Vaccine {
        Vaccine {
            vaccine_id: self.vaccine_id.filter(|id| !id.is_empty()),
            name: self.name.unwrap_or_default(),
            compositions: self.compositions.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            picture_url: self.picture_url.unwrap_or_default(),
            status: VaccineStatus::from_raw(self.status.as_deref()),
            pharmacy_no: self
                .pharmacy_no
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| pharmacy_no.to_string()),
        }
    }
}

/// Values entered in the add/edit dialog.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct VaccineForm {
    pub name: String,
    pub compositions: String,
    pub description: String,
    pub price: String,
    pub picture_url: String,
    pub status: VaccineStatus,
}

impl VaccineForm {
    /// Pre-filled from an existing entry (edit mode).
    pub fn from_vaccine(vaccine: &Vaccine) -> Self {
        Self {
            name: vaccine.name.clone(),
            compositions: vaccine.compositions.clone(),
            description: vaccine.description.clone(),
            price: vaccine.price.clone(),
            picture_url: vaccine.picture_url.clone(),
            status: vaccine.status,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required("Name"));
        }
        if self.compositions.trim().is_empty() {
            return Err(ValidationError::Required("Compositions"));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::Required("Description"));
        }
        crate::utils::validation::validate_price(&self.price)?;
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Debug)]
#[serde(rename_all = "UPPERCASE")]
pub enum VaccineAction {
    Add,
    Update,
}

/// `vaccine` block of a `manage-vaccine` command.
#[derive(Clone, PartialEq, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VaccinePayload {
    /// Always the pre-edit name on UPDATE.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compositions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
    pub status: VaccineStatus,
    pub pharmacy_no: String,
    #[serde(rename = "vaccineID", skip_serializing_if = "Option::is_none")]
    pub vaccine_id: Option<String>,
    /// Requested rename, carried next to the unchanged original name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
}

/// Command envelope `{action, vaccine}` posted to `manage-vaccine`.
#[derive(Clone, PartialEq, Serialize, Debug)]
pub struct VaccineCommand {
    pub action: VaccineAction,
    pub vaccine: VaccinePayload,
}

impl VaccineCommand {
    pub fn add(form: &VaccineForm, pharmacy_no: &str) -> Self {
        Self {
            action: VaccineAction::Add,
            vaccine: VaccinePayload {
                name: form.name.clone(),
                compositions: Some(form.compositions.clone()),
                description: Some(form.description.clone()),
                price: Some(form.price.trim().to_string()),
                picture_url: Some(form.picture_url.clone()),
                status: form.status,
                pharmacy_no: pharmacy_no.to_string(),
                vaccine_id: None,
                new_name: None,
            },
        }
    }

    /// Full edit. The identifying `name` stays the original one; a changed
    /// name travels in `newName`.
    pub fn update(original: &Vaccine, form: &VaccineForm, pharmacy_no: &str) -> Self {
        let new_name = (form.name != original.name).then(|| form.name.clone());
        Self {
            action: VaccineAction::Update,
            vaccine: VaccinePayload {
                name: original.name.clone(),
                compositions: Some(form.compositions.clone()),
                description: Some(form.description.clone()),
                price: Some(form.price.trim().to_string()),
                picture_url: Some(form.picture_url.clone()),
                status: form.status,
                pharmacy_no: pharmacy_no.to_string(),
                vaccine_id: original.vaccine_id.clone(),
                new_name,
            },
        }
    }

    /// Availability switch: only name, status and tenant are sent.
    pub fn set_status(original: &Vaccine, status: VaccineStatus, pharmacy_no: &str) -> Self {
        Self {
            action: VaccineAction::Update,
            vaccine: VaccinePayload {
                name: original.name.clone(),
                compositions: None,
                description: None,
                price: None,
                picture_url: None,
                status,
                pharmacy_no: pharmacy_no.to_string(),
                vaccine_id: original.vaccine_id.clone(),
                new_name: None,
            },
        }
    }
}
