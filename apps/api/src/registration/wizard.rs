//! The three-step registration wizard.
//!
//! Personal info → upload → payment → complete. Each transition is only
//! accepted from its own step, so steps can be neither skipped nor revisited.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::errors::AppError;
use crate::events::EventType;
use crate::registration::{ParticipantRecord, PaymentStatus, RegistrationStatus};
use crate::upload::{FileMetadata, MAX_UPLOAD_BYTES};
use crate::validation::{is_valid_email, is_valid_phone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    PersonalInfo,
    Upload,
    Payment,
    Complete,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WizardStep::PersonalInfo => "personal info",
            WizardStep::Upload => "upload",
            WizardStep::Payment => "payment",
            WizardStep::Complete => "complete",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum WizardError {
    #[error("registration is at the {actual} step, not {expected}")]
    WrongStep {
        expected: WizardStep,
        actual: WizardStep,
    },

    #[error("Please fill all required fields")]
    MissingFields,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid 10-digit phone number")]
    InvalidPhone,

    #[error("Please upload your submission file")]
    MissingFile,

    #[error("File size must be less than 50MB")]
    FileTooLarge { size: u64 },

    #[error("Payment is already in progress for this registration")]
    PaymentInProgress,
}

impl From<WizardError> for AppError {
    fn from(e: WizardError) -> Self {
        match e {
            WizardError::WrongStep { .. } | WizardError::PaymentInProgress => {
                AppError::Conflict(e.to_string())
            }
            other => AppError::Validation(other.to_string()),
        }
    }
}

fn default_participant_category() -> String {
    "individual".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default = "default_participant_category")]
    pub participant_category: String,
    #[serde(default)]
    pub previous_experience: String,
}

impl PersonalInfo {
    /// Step 1 gate: every contact field filled, then email, then phone.
    pub fn validate(&self) -> Result<(), WizardError> {
        let required = [
            &self.full_name,
            &self.email,
            &self.phone,
            &self.address,
            &self.age,
            &self.city,
            &self.state,
        ];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err(WizardError::MissingFields);
        }
        if !is_valid_email(&self.email) {
            return Err(WizardError::InvalidEmail);
        }
        if !is_valid_phone(&self.phone) {
            return Err(WizardError::InvalidPhone);
        }
        Ok(())
    }
}

/// A registration in progress, persisted between requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDraft {
    pub id: String,
    pub event_type: EventType,
    pub step: WizardStep,
    pub personal_info: Option<PersonalInfo>,
    pub submission: Option<FileMetadata>,
    pub payment_status: PaymentStatus,
    pub participant_id: Option<String>,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RegistrationDraft {
    pub fn new(event_type: EventType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            event_type,
            step: WizardStep::PersonalInfo,
            personal_info: None,
            submission: None,
            payment_status: PaymentStatus::Pending,
            participant_id: None,
            payment_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn expect_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    /// Step 1 → 2.
    pub fn submit_personal_info(&mut self, info: PersonalInfo) -> Result<(), WizardError> {
        self.expect_step(WizardStep::PersonalInfo)?;
        info.validate()?;
        self.personal_info = Some(info);
        self.advance(WizardStep::Upload);
        Ok(())
    }

    /// Step 2 → 3. Only the file's metadata is kept.
    pub fn attach_submission(&mut self, file: Option<FileMetadata>) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Upload)?;
        let file = file.ok_or(WizardError::MissingFile)?;
        if file.size > MAX_UPLOAD_BYTES {
            return Err(WizardError::FileTooLarge { size: file.size });
        }
        self.submission = Some(file);
        self.advance(WizardStep::Payment);
        Ok(())
    }

    /// Claims the draft for payment. Only one claim may be open at a time.
    pub fn begin_payment(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Payment)?;
        if self.payment_status == PaymentStatus::Processing {
            return Err(WizardError::PaymentInProgress);
        }
        self.payment_status = PaymentStatus::Processing;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Releases a claim whose charge did not go through.
    pub fn abandon_payment(&mut self) {
        if self.payment_status == PaymentStatus::Processing {
            self.payment_status = PaymentStatus::Pending;
            self.updated_at = Utc::now();
        }
    }

    /// Step 3 → complete, once the fee has been paid. Returns the record to
    /// append to the participant list.
    pub fn complete(
        &mut self,
        participant_id: String,
        payment_id: String,
        now: DateTime<Utc>,
    ) -> Result<ParticipantRecord, WizardError> {
        self.expect_step(WizardStep::Payment)?;
        let info = self.personal_info.clone().ok_or(WizardError::MissingFields)?;
        let submission = self.submission.as_ref().ok_or(WizardError::MissingFile)?;

        let record = ParticipantRecord {
            full_name: info.full_name,
            email: info.email,
            phone: info.phone,
            address: info.address,
            age: info.age,
            city: info.city,
            state: info.state,
            participant_category: info.participant_category,
            previous_experience: info.previous_experience,
            participant_id: participant_id.clone(),
            event_type: self.event_type,
            event_name: self.event_type.title(),
            registration_date: now,
            status: RegistrationStatus::Registered,
            payment_status: PaymentStatus::Completed,
            payment_id: payment_id.clone(),
            submission_file_name: submission.file_name.clone(),
        };

        self.participant_id = Some(participant_id);
        self.payment_id = Some(payment_id);
        self.payment_status = PaymentStatus::Completed;
        self.step = WizardStep::Complete;
        self.updated_at = now;
        Ok(record)
    }

    fn advance(&mut self, next: WizardStep) {
        self.step = next;
        self.updated_at = Utc::now();
    }
}
