//! Participant registration: the wizard, its persisted drafts and the
//! participant records it produces.

pub mod handlers;
pub mod participant_id;
pub mod wizard;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::events::{EventType, REGISTRATION_FEE_INR};
use crate::payments::gateway::{
    PaymentConfirmation, PaymentGateway, PaymentOrder, CURRENCY_INR,
};
use crate::registration::participant_id::generate_participant_id;
use crate::registration::wizard::{RegistrationDraft, WizardStep};
use crate::storage::{Repository, StorageKey};
use crate::users::{mark_participated, normalize_email, UserRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Registered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    /// The fee is being charged; no second charge may start.
    Processing,
    Completed,
}

/// A completed registration, as appended to `kalakriti-participants`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRecord {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub age: String,
    pub city: String,
    pub state: String,
    pub participant_category: String,
    #[serde(default)]
    pub previous_experience: String,
    pub participant_id: String,
    pub event_type: EventType,
    pub event_name: String,
    pub registration_date: DateTime<Utc>,
    pub status: RegistrationStatus,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_id: String,
    #[serde(default)]
    pub submission_file_name: String,
}

type DraftMap = HashMap<String, RegistrationDraft>;

pub async fn create_draft(
    repo: &Repository,
    event_type: EventType,
) -> Result<RegistrationDraft, AppError> {
    let draft = RegistrationDraft::new(event_type);
    let stored = draft.clone();
    repo.update(StorageKey::RegistrationDrafts, |drafts: &mut DraftMap| {
        drafts.insert(stored.id.clone(), stored);
        Ok::<_, AppError>(())
    })
    .await?;
    Ok(draft)
}

pub async fn load_draft(repo: &Repository, id: &str) -> Result<RegistrationDraft, AppError> {
    let mut drafts: DraftMap = repo.load(StorageKey::RegistrationDrafts).await?;
    drafts
        .remove(id)
        .ok_or_else(|| AppError::NotFound(format!("Registration {id} not found")))
}

/// Runs one wizard transition against the stored draft. The draft is only
/// written back when the transition succeeds.
pub async fn advance_draft<R, F>(repo: &Repository, id: &str, f: F) -> Result<R, AppError>
where
    F: FnOnce(&mut RegistrationDraft) -> Result<R, AppError>,
{
    repo.update(StorageKey::RegistrationDrafts, |drafts: &mut DraftMap| {
        let draft = drafts
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Registration {id} not found")))?;
        f(draft)
    })
    .await
}

/// Outcome of the payment step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceipt {
    pub participant_id: String,
    pub payment_id: String,
    pub order_id: String,
    pub amount: u64,
    pub currency: String,
    pub record: ParticipantRecord,
}

/// Charges the registration fee for draft `id`.
async fn charge_fee(
    gateway: &dyn PaymentGateway,
    id: &str,
) -> Result<(PaymentOrder, PaymentConfirmation), AppError> {
    let order = gateway
        .create_order(u64::from(REGISTRATION_FEE_INR) * 100, CURRENCY_INR, id)
        .await?;
    let confirmation = gateway.checkout(&order.id).await?;
    if !gateway.verify(&confirmation) {
        return Err(AppError::Payment(format!(
            "signature mismatch for order {}",
            order.id
        )));
    }
    Ok((order, confirmation))
}

/// Step 3: charges the registration fee, issues the participant ID and
/// appends the participant record. A signed-in caller gets the ID recorded
/// on their account.
///
/// The draft is claimed under the write lock before any order is created, so
/// a concurrent call for the same draft is refused without being charged.
/// A failed charge releases the claim.
pub async fn complete_registration(
    repo: &Repository,
    gateway: &dyn PaymentGateway,
    id: &str,
    user: Option<&UserRecord>,
) -> Result<RegistrationReceipt, AppError> {
    let event_type = advance_draft(repo, id, |draft| {
        draft.begin_payment()?;
        Ok(draft.event_type)
    })
    .await?;

    let (order, confirmation) = match charge_fee(gateway, id).await {
        Ok(charged) => charged,
        Err(e) => {
            warn!("Payment for registration {id} failed, releasing it: {e}");
            let released = advance_draft(repo, id, |draft| {
                draft.abandon_payment();
                Ok(())
            })
            .await;
            if let Err(release) = released {
                error!("Could not release registration {id}: {release}");
            }
            return Err(e);
        }
    };

    let participant_id = generate_participant_id(event_type, &mut rand::thread_rng());
    let payment_id = confirmation.payment_id.clone();
    let record = advance_draft(repo, id, |draft| {
        Ok(draft.complete(participant_id, payment_id, Utc::now())?)
    })
    .await?;

    let appended = record.clone();
    repo.update(StorageKey::Participants, |records: &mut Vec<ParticipantRecord>| {
        records.push(appended);
        Ok::<_, AppError>(())
    })
    .await?;

    if let Some(user) = user {
        mark_participated(repo, &user.email, &record.participant_id).await?;
    }

    info!(
        "Registration {} complete: {} for {} (payment {})",
        id, record.participant_id, record.event_type, record.payment_id
    );
    Ok(RegistrationReceipt {
        participant_id: record.participant_id.clone(),
        payment_id: confirmation.payment_id,
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
        record,
    })
}

pub async fn list_participants(repo: &Repository) -> Result<Vec<ParticipantRecord>, AppError> {
    Ok(repo.load(StorageKey::Participants).await?)
}

pub async fn registrations_for_email(
    repo: &Repository,
    email: &str,
) -> Result<Vec<ParticipantRecord>, AppError> {
    let wanted = normalize_email(email);
    Ok(list_participants(repo)
        .await?
        .into_iter()
        .filter(|r| normalize_email(&r.email) == wanted)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::gateway::{MockPaymentGateway, PaymentError};
    use crate::registration::wizard::PersonalInfo;
    use crate::storage::memory::MemoryStore;
    use crate::upload::FileMetadata;
    use crate::users::{find_by_email, fixtures, insert_user};
    use std::sync::Arc;
    use std::time::Duration;

    fn repo() -> Repository {
        Repository::new(Arc::new(MemoryStore::default()))
    }

    fn info(email: &str) -> PersonalInfo {
        PersonalInfo {
            full_name: "Asha Patil".to_string(),
            email: email.to_string(),
            phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
            age: "24".to_string(),
            city: "Nagpur".to_string(),
            state: "Maharashtra".to_string(),
            participant_category: "individual".to_string(),
            previous_experience: String::new(),
        }
    }

    async fn draft_at_payment(repo: &Repository, email: &str) -> String {
        let draft = create_draft(repo, EventType::Dance).await.unwrap();
        advance_draft(repo, &draft.id, |d| Ok(d.submit_personal_info(info(email))?))
            .await
            .unwrap();
        advance_draft(repo, &draft.id, |d| {
            Ok(d.attach_submission(Some(FileMetadata {
                file_name: "routine.mp4".to_string(),
                content_type: None,
                size: 2048,
            }))?)
        })
        .await
        .unwrap();
        draft.id
    }

    #[tokio::test]
    async fn test_failed_transition_is_not_persisted() {
        let repo = repo();
        let draft = create_draft(&repo, EventType::Art).await.unwrap();
        let mut bad = info("asha@example.com");
        bad.phone = "123".to_string();
        let err = advance_draft(&repo, &draft.id, |d| Ok(d.submit_personal_info(bad)?))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let stored = load_draft(&repo, &draft.id).await.unwrap();
        assert_eq!(stored.step, WizardStep::PersonalInfo);
    }

    #[tokio::test]
    async fn test_unknown_draft_is_not_found() {
        let repo = repo();
        assert!(matches!(
            load_draft(&repo, "nope").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_payment_completes_and_appends_record() {
        let repo = repo();
        let gateway = MockPaymentGateway::new("secret", Duration::ZERO);
        let id = draft_at_payment(&repo, "asha@example.com").await;

        let receipt = complete_registration(&repo, &gateway, &id, None).await.unwrap();
        assert!(receipt.participant_id.starts_with("S1D25"));
        assert_eq!(receipt.amount, 15_000);
        assert_eq!(receipt.currency, "INR");

        let participants = list_participants(&repo).await.unwrap();
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].participant_id, receipt.participant_id);
        assert_eq!(participants[0].payment_id, receipt.payment_id);

        let draft = load_draft(&repo, &id).await.unwrap();
        assert_eq!(draft.step, WizardStep::Complete);

        // A second payment call is for the wrong step.
        let err = complete_registration(&repo, &gateway, &id, None).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(list_participants(&repo).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_payment_before_upload_is_rejected() {
        let repo = repo();
        let gateway = MockPaymentGateway::new("secret", Duration::ZERO);
        let draft = create_draft(&repo, EventType::Art).await.unwrap();
        let err = complete_registration(&repo, &gateway, &draft.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(list_participants(&repo).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_signed_in_user_gets_contestant_id() {
        let repo = repo();
        let gateway = MockPaymentGateway::new("secret", Duration::ZERO);
        insert_user(&repo, fixtures::user("asha@example.com")).await.unwrap();
        let user = find_by_email(&repo, "asha@example.com").await.unwrap().unwrap();
        let id = draft_at_payment(&repo, "asha@example.com").await;

        let receipt = complete_registration(&repo, &gateway, &id, Some(&user))
            .await
            .unwrap();

        let user = find_by_email(&repo, "asha@example.com").await.unwrap().unwrap();
        assert!(user.has_participated);
        assert_eq!(user.contestant_id, Some(receipt.participant_id));

        let mine = registrations_for_email(&repo, "ASHA@example.com").await.unwrap();
        assert_eq!(mine.len(), 1);
    }

    /// Counts checkouts and can be told to fail them.
    struct CountingGateway {
        inner: MockPaymentGateway,
        checkouts: std::sync::atomic::AtomicUsize,
        fail: bool,
    }

    impl CountingGateway {
        fn new(delay: Duration, fail: bool) -> Self {
            Self {
                inner: MockPaymentGateway::new("secret", delay),
                checkouts: std::sync::atomic::AtomicUsize::new(0),
                fail,
            }
        }

        fn checkouts(&self) -> usize {
            self.checkouts.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl PaymentGateway for CountingGateway {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn create_order(
            &self,
            amount: u64,
            currency: &str,
            receipt: &str,
        ) -> Result<PaymentOrder, PaymentError> {
            self.inner.create_order(amount, currency, receipt).await
        }

        async fn checkout(&self, order_id: &str) -> Result<PaymentConfirmation, PaymentError> {
            self.checkouts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if self.fail {
                return Err(PaymentError::Gateway("card declined".to_string()));
            }
            self.inner.checkout(order_id).await
        }

        fn verify(&self, confirmation: &PaymentConfirmation) -> bool {
            self.inner.verify(confirmation)
        }
    }

    #[tokio::test]
    async fn test_concurrent_payments_charge_once() {
        let repo = repo();
        let gateway = CountingGateway::new(Duration::from_millis(50), false);
        let id = draft_at_payment(&repo, "asha@example.com").await;

        let (a, b) = tokio::join!(
            complete_registration(&repo, &gateway, &id, None),
            complete_registration(&repo, &gateway, &id, None),
        );
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        let refused = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
        assert!(matches!(refused, AppError::Conflict(_)));

        assert_eq!(gateway.checkouts(), 1);
        assert_eq!(list_participants(&repo).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_charge_releases_the_draft() {
        let repo = repo();
        let declining = CountingGateway::new(Duration::ZERO, true);
        let id = draft_at_payment(&repo, "asha@example.com").await;

        let err = complete_registration(&repo, &declining, &id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Payment(_)));
        let draft = load_draft(&repo, &id).await.unwrap();
        assert_eq!(draft.step, WizardStep::Payment);
        assert_eq!(draft.payment_status, PaymentStatus::Pending);
        assert!(list_participants(&repo).await.unwrap().is_empty());

        // The released draft can be paid again.
        let gateway = MockPaymentGateway::new("secret", Duration::ZERO);
        complete_registration(&repo, &gateway, &id, None).await.unwrap();
        assert_eq!(list_participants(&repo).await.unwrap().len(), 1);
    }
}
