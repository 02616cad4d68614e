//! Contact-form queries and their admin triage.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::storage::{Repository, StorageKey};
use crate::validation::{require_email, require_filled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Pending,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactQuery {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
    pub status: QueryStatus,
}

impl ContactQuery {
    /// `needle` must already be lowercased.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
            || self
                .subject
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(needle))
            || self.id.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn submit_query(repo: &Repository, new: NewQuery) -> Result<ContactQuery, AppError> {
    require_filled(&[&new.name, &new.email, &new.message])?;
    require_email(new.email.trim())?;

    let id = Uuid::new_v4().simple().to_string();
    let query = ContactQuery {
        id: format!("QRY-{}", id[..8].to_uppercase()),
        name: new.name.trim().to_string(),
        email: new.email.trim().to_string(),
        phone: non_blank(new.phone),
        subject: non_blank(new.subject),
        message: new.message.trim().to_string(),
        submitted_at: Utc::now(),
        status: QueryStatus::Pending,
    };
    let stored = query.clone();
    repo.update(StorageKey::Queries, |queries: &mut Vec<ContactQuery>| {
        queries.push(stored);
        Ok::<_, AppError>(())
    })
    .await?;
    info!("Contact query {} received from {}", query.id, query.email);
    Ok(query)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryListing {
    pub total: usize,
    pub pending: usize,
    pub resolved: usize,
    pub queries: Vec<ContactQuery>,
}

/// Newest first, optionally filtered. Counts cover every stored query.
pub fn build_listing(mut all: Vec<ContactQuery>, search: Option<&str>) -> QueryListing {
    all.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    let pending = all.iter().filter(|q| q.status == QueryStatus::Pending).count();
    let resolved = all.len() - pending;
    let total = all.len();

    let queries = match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(term) => {
            let needle = term.to_lowercase();
            all.into_iter().filter(|q| q.matches(&needle)).collect()
        }
        None => all,
    };
    QueryListing {
        total,
        pending,
        resolved,
        queries,
    }
}

pub async fn list_queries(
    repo: &Repository,
    search: Option<&str>,
) -> Result<QueryListing, AppError> {
    let all: Vec<ContactQuery> = repo.load(StorageKey::Queries).await?;
    Ok(build_listing(all, search))
}

pub async fn resolve_query(repo: &Repository, id: &str) -> Result<ContactQuery, AppError> {
    repo.update(StorageKey::Queries, |queries: &mut Vec<ContactQuery>| {
        let query = queries
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Query {id} not found")))?;
        query.status = QueryStatus::Resolved;
        Ok(query.clone())
    })
    .await
}
