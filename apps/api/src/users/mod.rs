//! Accounts: the stored user record and the profile shown to its owner.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::password::PasswordHash;
use crate::errors::AppError;
use crate::registration::{registrations_for_email, ParticipantRecord};
use crate::results::models::SearchHit;
use crate::results::store::{list_results, search};
use crate::storage::{Repository, StorageKey};
use crate::submissions::{submissions_for, Submission};
use crate::validation::require_phone;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub credentials: PasswordHash,
    pub signed_up_at: DateTime<Utc>,
    #[serde(default)]
    pub has_participated: bool,
    #[serde(default)]
    pub contestant_id: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
}

impl UserRecord {
    pub fn participated(&self) -> bool {
        self.has_participated || self.contestant_id.is_some()
    }
}

/// A user record without its credentials.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub signed_up_at: DateTime<Utc>,
    pub has_participated: bool,
    pub contestant_id: Option<String>,
    pub age: Option<u32>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

impl From<&UserRecord> for UserProfile {
    fn from(user: &UserRecord) -> Self {
        Self {
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            signed_up_at: user.signed_up_at,
            has_participated: user.participated(),
            contestant_id: user.contestant_id.clone(),
            age: user.age,
            address: user.address.clone(),
            city: user.city.clone(),
            state: user.state.clone(),
            pincode: user.pincode.clone(),
        }
    }
}

/// Emails are compared trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn find_by_email(repo: &Repository, email: &str) -> Result<Option<UserRecord>, AppError> {
    let wanted = normalize_email(email);
    let users: Vec<UserRecord> = repo.load(StorageKey::Users).await?;
    Ok(users.into_iter().find(|u| normalize_email(&u.email) == wanted))
}

/// Appends a new user, refusing a second account for the same email.
pub async fn insert_user(repo: &Repository, user: UserRecord) -> Result<(), AppError> {
    repo.update(StorageKey::Users, |users: &mut Vec<UserRecord>| {
        let wanted = normalize_email(&user.email);
        if users.iter().any(|u| normalize_email(&u.email) == wanted) {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }
        users.push(user);
        Ok(())
    })
    .await
}

/// Applies `f` to the user with `email` and returns the updated record.
pub async fn update_user<F>(repo: &Repository, email: &str, f: F) -> Result<UserRecord, AppError>
where
    F: FnOnce(&mut UserRecord) -> Result<(), AppError>,
{
    let wanted = normalize_email(email);
    repo.update(StorageKey::Users, |users: &mut Vec<UserRecord>| {
        let user = users
            .iter_mut()
            .find(|u| normalize_email(&u.email) == wanted)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        f(user)?;
        Ok(user.clone())
    })
    .await
}

/// Records a completed registration against the user: the first contestant
/// ID issued sticks.
pub async fn mark_participated(
    repo: &Repository,
    email: &str,
    participant_id: &str,
) -> Result<UserRecord, AppError> {
    update_user(repo, email, |user| {
        user.has_participated = true;
        if user.contestant_id.is_none() {
            user.contestant_id = Some(participant_id.to_string());
        }
        Ok(())
    })
    .await
}

/// Editable profile fields. Absent fields are left as they are; name, email
/// and contestant ID cannot be changed here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub phone_number: Option<String>,
    pub age: Option<u32>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

impl ProfileUpdate {
    pub fn apply(self, user: &mut UserRecord) -> Result<(), AppError> {
        if let Some(phone) = self.phone_number {
            let phone = phone.trim().to_string();
            require_phone(&phone)?;
            user.phone_number = phone;
        }
        if self.age.is_some() {
            user.age = self.age;
        }
        let trimmed = |v: String| Some(v.trim().to_string()).filter(|v| !v.is_empty());
        if let Some(address) = self.address {
            user.address = trimmed(address);
        }
        if let Some(city) = self.city {
            user.city = trimmed(city);
        }
        if let Some(state) = self.state {
            user.state = trimmed(state);
        }
        if let Some(pincode) = self.pincode {
            user.pincode = trimmed(pincode);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub profile: UserProfile,
    pub has_participated: bool,
    pub submissions: Vec<Submission>,
    pub registrations: Vec<ParticipantRecord>,
    pub placements: Vec<SearchHit>,
}

/// Search hits for exactly this contestant ID; a substring match on another
/// contestant's ID or name does not count.
pub fn placements_from(hits: Vec<SearchHit>, contestant_id: &str) -> Vec<SearchHit> {
    hits.into_iter()
        .filter(|hit| hit.entry.participant_id == contestant_id)
        .collect()
}

pub async fn dashboard_for(repo: &Repository, user: &UserRecord) -> Result<Dashboard, AppError> {
    let submissions = submissions_for(repo, user).await?;
    let registrations = registrations_for_email(repo, &user.email).await?;
    let placements = match user.contestant_id.as_deref() {
        Some(id) => {
            let results = list_results(repo).await?;
            placements_from(search(&results, id), id)
        }
        None => Vec::new(),
    };
    Ok(Dashboard {
        profile: UserProfile::from(user),
        has_participated: user.participated(),
        submissions,
        registrations,
        placements,
    })
}
