//! Personal details, the mutable draft and the immutable finalized record.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::document::DocumentRecord;
use crate::error::{FieldError, FieldProblem, ValidationErrors};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern is valid")
});

/// The form fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    City,
    State,
    ZipCode,
    Country,
    Company,
    JobTitle,
    Notes,
}

impl ProfileField {
    pub const REQUIRED: [ProfileField; 9] = [
        ProfileField::FirstName,
        ProfileField::LastName,
        ProfileField::Email,
        ProfileField::Phone,
        ProfileField::Address,
        ProfileField::City,
        ProfileField::State,
        ProfileField::ZipCode,
        ProfileField::Country,
    ];

    pub fn label(self) -> &'static str {
        use ProfileField::*;
        match self {
            FirstName => "First name",
            LastName => "Last name",
            Email => "Email",
            Phone => "Phone number",
            Address => "Address",
            City => "City",
            State => "State",
            ZipCode => "ZIP code",
            Country => "Country",
            Company => "Company",
            JobTitle => "Job title",
            Notes => "Additional notes",
        }
    }
}

/// Personal and professional details. Used as-is for the editable draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// In-progress form state owned by an editing session.
pub type DraftProfile = PersonalDetails;

impl PersonalDetails {
    /// Value of a required field.
    pub fn required(&self, field: ProfileField) -> Option<&str> {
        use ProfileField::*;
        let value = match field {
            FirstName => &self.first_name,
            LastName => &self.last_name,
            Email => &self.email,
            Phone => &self.phone,
            Address => &self.address,
            City => &self.city,
            State => &self.state,
            ZipCode => &self.zip_code,
            Country => &self.country,
            Company | JobTitle | Notes => return None,
        };
        Some(value)
    }

    /// Field errors in form order; empty when the details are complete.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for field in ProfileField::REQUIRED {
            let value = self.required(field).unwrap_or_default().trim();
            if value.is_empty() {
                errors.push(FieldError {
                    field,
                    problem: FieldProblem::Missing,
                });
            } else if field == ProfileField::Email && !EMAIL_PATTERN.is_match(value) {
                errors.push(FieldError {
                    field,
                    problem: FieldProblem::InvalidEmail,
                });
            }
        }
        errors
    }

    /// Trimmed copy with blank optional fields dropped.
    fn normalized(&self) -> Self {
        let optional = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            country: self.country.trim().to_string(),
            company: optional(&self.company),
            job_title: optional(&self.job_title),
            notes: optional(&self.notes),
        }
    }
}

/// A finalized profile. Fields are read-only; a change means finalizing a new draft.
///
/// Serialized field order is the declaration order, which keeps payloads canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    id: Uuid,
    #[serde(flatten)]
    details: PersonalDetails,
    created_at: DateTime<Utc>,
    documents: Vec<DocumentRecord>,
}

impl ProfileRecord {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn details(&self) -> &PersonalDetails {
        &self.details
    }

    pub fn first_name(&self) -> &str {
        &self.details.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.details.last_name
    }

    pub fn email(&self) -> &str {
        &self.details.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents
    }

    pub fn document(&self, id: Uuid) -> Option<&DocumentRecord> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// `"<first> <last>"`, as shown above the QR code.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.details.first_name, self.details.last_name)
    }
}

/// Validates `draft` and freezes it with a copy of `documents` into a new record.
///
/// Every invalid field is reported; no record is built unless all pass.
pub fn finalize(draft: &DraftProfile, documents: &[DocumentRecord]) -> Result<ProfileRecord, ValidationErrors> {
    let errors = draft.validate();
    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    let record = ProfileRecord {
        id: Uuid::new_v4(),
        details: draft.normalized(),
        created_at: Utc::now(),
        documents: documents.to_vec(),
    };
    info!(id = %record.id, documents = record.documents.len(), "profile finalized");
    Ok(record)
}
