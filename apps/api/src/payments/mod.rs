pub mod gateway;
pub mod handlers;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::events::{event_details, EventType};
use crate::storage::{Repository, StorageKey};

/// What an anonymous visitor meant to buy before being sent to log in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub event_type: EventType,
    pub number_of_artworks: u32,
}

/// Price of a submission tier, in paise.
pub fn tier_amount_paise(
    event_type: EventType,
    number_of_artworks: u32,
) -> Result<u64, AppError> {
    event_details(event_type)
        .price_for(number_of_artworks)
        .map(|inr| u64::from(inr) * 100)
        .ok_or_else(|| {
            AppError::Validation(format!(
                "{} does not offer a {}-artwork package",
                event_type.title(),
                number_of_artworks
            ))
        })
}

/// Saved intents, keyed by the id handed back to the visitor who saved them.
type IntentMap = HashMap<String, PaymentIntent>;

/// Stores `intent` and returns the id that claims it at login.
pub async fn save_intent(repo: &Repository, intent: PaymentIntent) -> Result<String, AppError> {
    let id = format!("intent_{}", Uuid::new_v4().simple());
    let key = id.clone();
    repo.update(StorageKey::PaymentIntent, move |intents: &mut IntentMap| {
        intents.insert(key, intent);
        Ok::<_, AppError>(())
    })
    .await?;
    Ok(id)
}

/// Returns the intent saved under `id`, if any, and clears it.
pub async fn take_intent(repo: &Repository, id: &str) -> Result<Option<PaymentIntent>, AppError> {
    repo.update(StorageKey::PaymentIntent, |intents: &mut IntentMap| {
        Ok::<_, AppError>(intents.remove(id))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn test_tier_amounts_in_paise() {
        assert_eq!(tier_amount_paise(EventType::Art, 1).unwrap(), 29_900);
        assert_eq!(tier_amount_paise(EventType::Dance, 3).unwrap(), 79_900);
        assert!(matches!(
            tier_amount_paise(EventType::Mehndi, 7),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_intent_is_returned_once() {
        let repo = Repository::new(Arc::new(MemoryStore::default()));
        let intent = PaymentIntent {
            event_type: EventType::Singing,
            number_of_artworks: 2,
        };
        let id = save_intent(&repo, intent.clone()).await.unwrap();
        assert!(id.starts_with("intent_"));
        assert_eq!(take_intent(&repo, &id).await.unwrap(), Some(intent));
        assert_eq!(take_intent(&repo, &id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_intents_are_kept_apart() {
        let repo = Repository::new(Arc::new(MemoryStore::default()));
        let art = PaymentIntent {
            event_type: EventType::Art,
            number_of_artworks: 1,
        };
        let dance = PaymentIntent {
            event_type: EventType::Dance,
            number_of_artworks: 3,
        };
        let art_id = save_intent(&repo, art.clone()).await.unwrap();
        let dance_id = save_intent(&repo, dance.clone()).await.unwrap();
        assert_ne!(art_id, dance_id);

        assert_eq!(take_intent(&repo, "intent_unknown").await.unwrap(), None);
        assert_eq!(take_intent(&repo, &dance_id).await.unwrap(), Some(dance));
        assert_eq!(take_intent(&repo, &art_id).await.unwrap(), Some(art));
    }
}
