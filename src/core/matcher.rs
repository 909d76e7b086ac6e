use std::sync::Arc;

use crate::core::{criteria::criteria, scoring::calculate_match_score};
use crate::models::{ClientFields, Lender, LenderGuidelines, LenderMatch, ScoringWeights};
use crate::services::store::{LenderStore, StoreError};

/// Outcome of processing one client submission
#[derive(Debug, Clone)]
pub struct Submission {
    pub client_id: i64,
    pub matches: Vec<LenderMatch>,
    /// False when the match set could not be persisted; `matches` is
    /// still the freshly computed list.
    pub saved: bool,
}

/// Score a client against a panel of lenders and rank the results
///
/// Lenders where no criterion applies are left out. The sort is stable,
/// so lenders with equal scores keep their panel order.
pub fn rank_lenders(
    client: &ClientFields,
    panel: &[(Lender, LenderGuidelines)],
    weights: &ScoringWeights,
) -> Vec<LenderMatch> {
    let criteria = criteria(weights);

    let mut matches: Vec<LenderMatch> = panel
        .iter()
        .filter_map(|(lender, guidelines)| {
            let (match_score, match_details) = calculate_match_score(client, guidelines, &criteria)?;

            Some(LenderMatch {
                lender_id: lender.lender_id,
                lender_name: lender.name.clone(),
                description: lender.description.clone(),
                match_score,
                match_details,
            })
        })
        .collect();

    // Sort by score (descending)
    matches.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    matches
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Load active lenders and their guidelines from the store
/// 2. Score each (client, lender) pair over the applicable criteria
/// 3. Rank by score
/// 4. Replace the client's stored match set
pub struct MatchingEngine<S> {
    store: Arc<S>,
    weights: ScoringWeights,
}

impl<S> Clone for MatchingEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            weights: self.weights,
        }
    }
}

impl<S: LenderStore> MatchingEngine<S> {
    pub fn new(store: Arc<S>, weights: ScoringWeights) -> Self {
        Self { store, weights }
    }

    pub fn with_default_weights(store: Arc<S>) -> Self {
        Self::new(store, ScoringWeights::default())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Find lenders matching a client, best score first
    ///
    /// Lenders without a guidelines record are skipped. Only store read
    /// failures surface as errors; scoring itself cannot fail.
    pub async fn find_matching_lenders(
        &self,
        client: &ClientFields,
    ) -> Result<Vec<LenderMatch>, StoreError> {
        let lenders = self.store.list_active_lenders().await?;
        let total_lenders = lenders.len();

        let mut panel = Vec::with_capacity(total_lenders);
        for lender in lenders {
            match self.store.get_guidelines(lender.lender_id).await? {
                Some(guidelines) => panel.push((lender, guidelines)),
                None => tracing::debug!(
                    "Skipping lender {} ({}): no guidelines",
                    lender.lender_id,
                    lender.name
                ),
            }
        }

        let matches = rank_lenders(client, &panel, &self.weights);

        tracing::debug!(
            "Scored {} of {} lenders ({} with guidelines)",
            matches.len(),
            total_lenders,
            panel.len()
        );

        Ok(matches)
    }

    /// Replace the stored match set for a client
    ///
    /// Returns false (after logging) if the store rejected the write, in
    /// which case the previous set is left untouched.
    pub async fn save_match_results(&self, client_id: i64, matches: &[LenderMatch]) -> bool {
        match self.store.replace_matches(client_id, matches).await {
            Ok(()) => {
                tracing::debug!("Saved {} matches for client {}", matches.len(), client_id);
                true
            }
            Err(e) => {
                tracing::error!("Error saving match results for client {}: {}", client_id, e);
                false
            }
        }
    }

    /// Persist a new client, match it and store the result set
    ///
    /// A failure to store the matches does not fail the submission; it is
    /// reported through [`Submission::saved`].
    pub async fn submit_client(&self, fields: ClientFields) -> Result<Submission, StoreError> {
        let fields = fields.normalized();
        let client_id = self.store.create_client(&fields).await?;
        let matches = self.find_matching_lenders(&fields).await?;
        let saved = self.save_match_results(client_id, &matches).await;

        tracing::info!(
            "Client {} matched {} lenders (saved: {})",
            client_id,
            matches.len(),
            saved
        );

        Ok(Submission {
            client_id,
            matches,
            saved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchOutcome;
    use crate::services::InMemoryStore;

    fn lender(id: i64, name: &str) -> Lender {
        Lender {
            lender_id: id,
            name: name.to_string(),
            program_type: "App Only".to_string(),
            description: Some(format!("{} description", name)),
            website: None,
            contact_email: None,
            contact_phone: None,
            active: true,
        }
    }

    fn credit_only(min: i32) -> LenderGuidelines {
        LenderGuidelines {
            min_credit_score: Some(min),
            ..Default::default()
        }
    }

    fn client(credit: &str) -> ClientFields {
        ClientFields {
            credit_score: Some(credit.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_rank_orders_by_score() {
        let panel = vec![
            (lender(1, "Strict"), LenderGuidelines {
                min_credit_score: Some(750),
                min_time_in_business: Some(12),
                ..Default::default()
            }),
            (lender(2, "Lenient"), credit_only(600)),
        ];
        let client = ClientFields {
            credit_score: Some("700".to_string()),
            time_in_business: Some("2 years".to_string()),
            ..Default::default()
        };

        let matches = rank_lenders(&client, &panel, &ScoringWeights::default());
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].lender_id, 2);
        assert_eq!(matches[0].match_score, 100.0);
        assert_eq!(matches[1].match_score, 50.0);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let panel: Vec<_> = (1..=5)
            .map(|id| (lender(id, "Tied"), credit_only(600)))
            .collect();

        let matches = rank_lenders(&client("650"), &panel, &ScoringWeights::default());
        let ids: Vec<i64> = matches.iter().map(|m| m.lender_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_rank_excludes_non_applicable_lenders() {
        let panel = vec![
            (lender(1, "Types only"), LenderGuidelines {
                equipment_types: Some("Medical".to_string()),
                ..Default::default()
            }),
            (lender(2, "Credit"), credit_only(600)),
        ];

        let matches = rank_lenders(&client("640"), &panel, &ScoringWeights::default());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].lender_id, 2);
    }

    #[tokio::test]
    async fn test_lender_without_guidelines_skipped() {
        let store = Arc::new(InMemoryStore::with_lenders(vec![
            (lender(1, "No guidelines"), None),
            (lender(2, "Has guidelines"), Some(credit_only(600))),
        ]));
        let engine = MatchingEngine::with_default_weights(store);

        let matches = engine.find_matching_lenders(&client("700")).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].lender_id, 2);
        assert_eq!(matches[0].lender_name, "Has guidelines");
        assert_eq!(matches[0].match_details[0].result, MatchOutcome::Match);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_set() {
        let store = Arc::new(InMemoryStore::with_lenders(vec![(
            lender(1, "Panel"),
            Some(credit_only(600)),
        )]));
        let engine = MatchingEngine::with_default_weights(Arc::clone(&store));

        let first = engine.submit_client(client("700")).await.unwrap();
        assert!(first.saved);

        let matches = engine.find_matching_lenders(&client("500")).await.unwrap();
        store.set_fail_writes(true);
        assert!(!engine.save_match_results(first.client_id, &matches).await);

        let stored = store.list_matches(first.client_id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].match_score, 100.0);
    }

    #[tokio::test]
    async fn test_submit_returns_matches_when_save_fails() {
        let store = Arc::new(InMemoryStore::with_lenders(vec![(
            lender(1, "Panel"),
            Some(credit_only(600)),
        )]));
        let engine = MatchingEngine::with_default_weights(Arc::clone(&store));
        store.set_fail_match_writes(true);

        let submission = engine.submit_client(client("700")).await.unwrap();
        assert!(!submission.saved);
        assert_eq!(submission.matches.len(), 1);
        assert_eq!(submission.matches[0].match_score, 100.0);

        assert!(store.get_client(submission.client_id).await.unwrap().is_some());
        assert!(store.list_matches(submission.client_id).await.unwrap().is_empty());
    }
}
