use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::storage::{Repository, StorageKey};

pub const TOKEN_PREFIX: &str = "auth-token-";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub email: String,
    pub issued_at: DateTime<Utc>,
}

type SessionMap = HashMap<String, Session>;

/// Opens a session for `email` and returns its bearer token.
pub async fn issue(repo: &Repository, email: &str) -> Result<String, AppError> {
    let token = format!("{TOKEN_PREFIX}{}", Uuid::new_v4());
    let session = Session {
        email: email.to_string(),
        issued_at: Utc::now(),
    };
    let issued = token.clone();
    repo.update(StorageKey::Sessions, |sessions: &mut SessionMap| {
        sessions.insert(issued, session);
        Ok::<_, AppError>(())
    })
    .await?;
    Ok(token)
}

pub async fn resolve(repo: &Repository, token: &str) -> Result<Option<Session>, AppError> {
    let mut sessions: SessionMap = repo.load(StorageKey::Sessions).await?;
    Ok(sessions.remove(token))
}

/// Drops the session; returns whether one existed.
pub async fn revoke(repo: &Repository, token: &str) -> Result<bool, AppError> {
    repo.update(StorageKey::Sessions, |sessions: &mut SessionMap| {
        Ok::<_, AppError>(sessions.remove(token).is_some())
    })
    .await
}
