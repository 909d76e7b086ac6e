use thiserror::Error;

use crate::models::{Client, ClientFields, Lender, LenderGuidelines, LenderMatch, StoredMatch};

/// Errors that can occur when reading or writing the data store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Data store collaborator for the matching engine
///
/// Lenders and guidelines are read-only here. Matches are only ever
/// written through [`LenderStore::replace_matches`], which swaps the whole
/// result set for a client in one transaction.
#[allow(async_fn_in_trait)]
pub trait LenderStore {
    /// Active lenders, in id order
    async fn list_active_lenders(&self) -> Result<Vec<Lender>, StoreError>;

    async fn get_guidelines(&self, lender_id: i64) -> Result<Option<LenderGuidelines>, StoreError>;

    /// Atomically replace every stored match for `client_id` with `matches`
    ///
    /// On error nothing is changed.
    async fn replace_matches(&self, client_id: i64, matches: &[LenderMatch]) -> Result<(), StoreError>;

    /// Persist a client and return its id
    async fn create_client(&self, client: &ClientFields) -> Result<i64, StoreError>;

    async fn get_client(&self, client_id: i64) -> Result<Option<Client>, StoreError>;

    async fn get_lender(&self, lender_id: i64) -> Result<Option<Lender>, StoreError>;

    /// Stored matches for a client, best score first
    async fn list_matches(&self, client_id: i64) -> Result<Vec<StoredMatch>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
