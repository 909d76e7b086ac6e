use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::models::{Client, ClientFields, Lender, LenderGuidelines, LenderMatch, StoredMatch};
use crate::services::store::{LenderStore, StoreError};

#[derive(Debug, Default)]
struct State {
    clients: Vec<Client>,
    lenders: Vec<Lender>,
    guidelines: HashMap<i64, LenderGuidelines>,
    matches: Vec<StoredMatch>,
}

/// Process-local store backed by a mutex
///
/// Used by tests and benchmarks. Writes can be forced to fail to exercise
/// the rollback path.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    fail_writes: AtomicBool,
    fail_match_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with lenders and their guidelines
    pub fn with_lenders(lenders: Vec<(Lender, Option<LenderGuidelines>)>) -> Self {
        let mut state = State::default();
        for (lender, guidelines) in lenders {
            if let Some(mut guidelines) = guidelines {
                guidelines.lender_id = lender.lender_id;
                state.guidelines.insert(lender.lender_id, guidelines);
            }
            state.lenders.push(lender);
        }

        Self {
            state: Mutex::new(state),
            fail_writes: AtomicBool::new(false),
            fail_match_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent write return [`StoreError::Unavailable`]
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make only [`LenderStore::replace_matches`] fail; clients can still be created
    pub fn set_fail_match_writes(&self, fail: bool) {
        self.fail_match_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }

    /// Count of stored matches across all clients
    pub async fn match_count(&self) -> usize {
        self.state.lock().await.matches.len()
    }
}

impl LenderStore for InMemoryStore {
    async fn list_active_lenders(&self) -> Result<Vec<Lender>, StoreError> {
        let state = self.state.lock().await;
        let mut lenders: Vec<Lender> = state.lenders.iter().filter(|l| l.active).cloned().collect();
        lenders.sort_by_key(|l| l.lender_id);
        Ok(lenders)
    }

    async fn get_guidelines(&self, lender_id: i64) -> Result<Option<LenderGuidelines>, StoreError> {
        Ok(self.state.lock().await.guidelines.get(&lender_id).cloned())
    }

    async fn replace_matches(&self, client_id: i64, matches: &[LenderMatch]) -> Result<(), StoreError> {
        self.check_writable()?;
        if self.fail_match_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("match writes disabled".to_string()));
        }

        let created_at = Utc::now();
        let rows: Vec<StoredMatch> = matches
            .iter()
            .map(|m| StoredMatch {
                client_id,
                lender_id: m.lender_id,
                match_score: m.match_score,
                match_details: m.match_details.clone(),
                created_at,
            })
            .collect();

        let mut state = self.state.lock().await;
        state.matches.retain(|m| m.client_id != client_id);
        state.matches.extend(rows);

        Ok(())
    }

    async fn create_client(&self, client: &ClientFields) -> Result<i64, StoreError> {
        self.check_writable()?;

        let mut state = self.state.lock().await;
        let client_id = state.clients.iter().map(|c| c.client_id).max().unwrap_or(0) + 1;
        state.clients.push(Client {
            client_id,
            fields: client.clone(),
            created_at: Utc::now(),
        });

        Ok(client_id)
    }

    async fn get_client(&self, client_id: i64) -> Result<Option<Client>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.clients.iter().find(|c| c.client_id == client_id).cloned())
    }

    async fn get_lender(&self, lender_id: i64) -> Result<Option<Lender>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.lenders.iter().find(|l| l.lender_id == lender_id).cloned())
    }

    async fn list_matches(&self, client_id: i64) -> Result<Vec<StoredMatch>, StoreError> {
        let state = self.state.lock().await;
        let mut matches: Vec<StoredMatch> = state
            .matches
            .iter()
            .filter(|m| m.client_id == client_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(matches)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
