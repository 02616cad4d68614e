//! Result Store: publish, browse and search published event results.
//!
//! Results live as one JSON list under `kalakriti-event-results`, in publish
//! order. Publishing appends; nothing is ever merged or overwritten, so the
//! same `(eventType, season)` pair may appear more than once. Browsing returns
//! the earliest published copy.

use chrono::Utc;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::events::EventType;
use crate::results::models::{
    position_label, AgeCategory, EventResult, Placement, SearchHit, TOP100_LIMIT,
    TOP_POSITIONS_LIMIT,
};
use crate::storage::{Repository, StorageKey};

/// Checks the invariants a result must satisfy before it is stored.
pub fn validate_for_publish(result: &EventResult) -> Result<(), AppError> {
    if result.season.trim().is_empty() {
        return Err(AppError::Validation("Season is required".to_string()));
    }
    for category in AgeCategory::ALL {
        let entries = result.top_positions.get(category);
        if entries.len() > TOP_POSITIONS_LIMIT {
            return Err(AppError::Validation(format!(
                "{} holds {} entries; at most {} are ranked",
                category.display_name(),
                entries.len(),
                TOP_POSITIONS_LIMIT
            )));
        }
        if let Some(stray) = entries.iter().find(|e| e.age_category != category) {
            return Err(AppError::Validation(format!(
                "Entry '{}' is filed under {} but has age category '{}'",
                stray.participant_id,
                category.as_str(),
                stray.age_category.as_str()
            )));
        }
    }
    if result.top100.len() > TOP100_LIMIT {
        return Err(AppError::Validation(format!(
            "Top 100 list holds {} entries",
            result.top100.len()
        )));
    }
    if let Some(blank) = result
        .buckets()
        .flat_map(|(_, entries)| entries.iter())
        .find(|e| e.participant_id.trim().is_empty())
    {
        return Err(AppError::Validation(format!(
            "Entry '{}' has no participant ID",
            blank.name
        )));
    }
    Ok(())
}

/// Appends `result` to the published list and returns the stored copy.
pub async fn publish_result(
    repo: &Repository,
    mut result: EventResult,
) -> Result<EventResult, AppError> {
    validate_for_publish(&result)?;

    result.is_published = true;
    result.published_date = Some(Utc::now());

    let stored = result.clone();
    let total = repo
        .update(StorageKey::EventResults, |results: &mut Vec<EventResult>| {
            if results
                .iter()
                .any(|r| r.event_type == stored.event_type && r.season == stored.season)
            {
                warn!(
                    "Results for {} season {} already published; storing another copy",
                    stored.event_type, stored.season
                );
            }
            results.push(stored);
            Ok::<_, AppError>(results.len())
        })
        .await?;

    info!(
        "Published {} results for {} season {} ({} stored in total)",
        result.entry_count(),
        result.event_type,
        result.season,
        total
    );
    Ok(result)
}

pub async fn list_results(repo: &Repository) -> Result<Vec<EventResult>, AppError> {
    Ok(repo.load(StorageKey::EventResults).await?)
}

/// First published result for the pair, if any.
pub async fn find_result(
    repo: &Repository,
    event_type: EventType,
    season: &str,
) -> Result<Option<EventResult>, AppError> {
    let results = list_results(repo).await?;
    Ok(results
        .into_iter()
        .find(|r| r.event_type == event_type && r.season == season))
}

pub async fn find_by_query(repo: &Repository, query: &str) -> Result<Vec<SearchHit>, AppError> {
    let results = list_results(repo).await?;
    Ok(search(&results, query))
}

pub async fn find_placement(
    repo: &Repository,
    contestant_id: &str,
) -> Result<Option<Placement>, AppError> {
    let results = list_results(repo).await?;
    Ok(placements_for(&results, contestant_id).into_iter().next())
}

/// Linear scan of every ranked list of every result. One hit per matching
/// entry, in result order then bucket order then rank order.
pub fn search(results: &[EventResult], query: &str) -> Vec<SearchHit> {
    let needle = query.to_lowercase();
    let mut hits = Vec::new();
    for result in results {
        for (bucket, entries) in result.buckets() {
            for entry in entries.iter().filter(|e| e.matches(&needle)) {
                hits.push(SearchHit {
                    entry: entry.clone(),
                    event_type: result.event_type,
                    season: result.season.clone(),
                    event_name: result.event_type.title(),
                    category_name: bucket.display_name().to_string(),
                    is_top100: bucket.is_top100(),
                    position_label: position_label(entry.position, bucket.is_top100()),
                });
            }
        }
    }
    hits
}

/// Every placement whose participant ID equals `contestant_id` exactly.
pub fn placements_for(results: &[EventResult], contestant_id: &str) -> Vec<Placement> {
    let mut placements = Vec::new();
    for result in results {
        for (bucket, entries) in result.buckets() {
            for entry in entries.iter().filter(|e| e.participant_id == contestant_id) {
                placements.push(Placement {
                    participant_id: entry.participant_id.clone(),
                    name: entry.name.clone(),
                    event_type: result.event_type,
                    season: result.season.clone(),
                    published_date: result.published_date,
                    bucket,
                    category_name: bucket.display_name().to_string(),
                    position: entry.position,
                    score: entry.score,
                });
            }
        }
    }
    placements
}
