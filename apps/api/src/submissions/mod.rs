//! Artwork submissions made after paying for a package.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::events::EventType;
use crate::storage::{Repository, StorageKey};
use crate::upload::FileMetadata;
use crate::users::{normalize_email, UserRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Submitted,
    UnderReview,
    Judged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub contestant_id: Option<String>,
    pub event_type: EventType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub files: Vec<FileMetadata>,
    pub payment_id: String,
    pub order_id: String,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub result: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    /// Linked by email or, when both sides carry one, by contestant ID.
    pub fn belongs_to(&self, user: &UserRecord) -> bool {
        if normalize_email(&self.email) == normalize_email(&user.email) {
            return true;
        }
        matches!(
            (&self.contestant_id, &user.contestant_id),
            (Some(ours), Some(theirs)) if ours == theirs
        )
    }
}

/// Fields of a new submission, before it gets an ID.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub event_type: EventType,
    pub title: String,
    pub description: String,
    pub payment_id: String,
    pub order_id: String,
    pub files: Vec<FileMetadata>,
}

pub async fn record_submission(
    repo: &Repository,
    user: &UserRecord,
    new: NewSubmission,
) -> Result<Submission, AppError> {
    let submission = Submission {
        id: Uuid::new_v4().to_string(),
        email: user.email.clone(),
        contestant_id: user.contestant_id.clone(),
        event_type: new.event_type,
        title: new.title,
        description: new.description,
        files: new.files,
        payment_id: new.payment_id,
        order_id: new.order_id,
        status: SubmissionStatus::Submitted,
        result: None,
        submitted_at: Utc::now(),
    };
    let stored = submission.clone();
    repo.update(StorageKey::Submissions, |all: &mut Vec<Submission>| {
        all.push(stored);
        Ok::<_, AppError>(())
    })
    .await?;
    info!(
        "Submission {} recorded for {} ({} file(s), {})",
        submission.id,
        submission.email,
        submission.files.len(),
        submission.event_type
    );
    Ok(submission)
}

pub async fn submissions_for(
    repo: &Repository,
    user: &UserRecord,
) -> Result<Vec<Submission>, AppError> {
    let all: Vec<Submission> = repo.load(StorageKey::Submissions).await?;
    Ok(all.into_iter().filter(|s| s.belongs_to(user)).collect())
}
