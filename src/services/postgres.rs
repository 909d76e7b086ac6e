use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::models::{
    Client, ClientFields, CriterionResult, Lender, LenderGuidelines, LenderMatch, StoredMatch,
};
use crate::services::store::{LenderStore, StoreError};

/// PostgreSQL-backed store for clients, lenders, guidelines and matches
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

fn lender_from_row(row: &PgRow) -> Result<Lender, sqlx::Error> {
    Ok(Lender {
        lender_id: row.try_get("lender_id")?,
        name: row.try_get("name")?,
        program_type: row.try_get("program_type")?,
        description: row.try_get("description")?,
        website: row.try_get("website")?,
        contact_email: row.try_get("contact_email")?,
        contact_phone: row.try_get("contact_phone")?,
        active: row.try_get("active")?,
    })
}

fn stored_match_from_row(row: &PgRow) -> Result<StoredMatch, sqlx::Error> {
    let Json(match_details): Json<Vec<CriterionResult>> = row.try_get("match_details")?;

    Ok(StoredMatch {
        client_id: row.try_get("client_id")?,
        lender_id: row.try_get("lender_id")?,
        match_score: row.try_get("match_score")?,
        match_details,
        created_at: row.try_get("created_at")?,
    })
}

impl LenderStore for PostgresClient {
    async fn list_active_lenders(&self) -> Result<Vec<Lender>, StoreError> {
        let query = r#"
            SELECT lender_id, name, program_type, description, website,
                   contact_email, contact_phone, active
            FROM lenders
            WHERE active = TRUE
            ORDER BY lender_id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        let lenders = rows.iter().map(lender_from_row).collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} active lenders", lenders.len());

        Ok(lenders)
    }

    async fn get_guidelines(&self, lender_id: i64) -> Result<Option<LenderGuidelines>, StoreError> {
        let query = r#"
            SELECT lender_id, min_credit_score, min_time_in_business, min_monthly_revenue,
                   min_equipment_cost, max_equipment_cost, equipment_types,
                   industries_accepted, industries_restricted, funding_speed,
                   rate_range, term_range, advance_rate
            FROM lender_guidelines
            WHERE lender_id = $1
        "#;

        let Some(row) = sqlx::query(query)
            .bind(lender_id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(LenderGuidelines {
            lender_id: row.try_get("lender_id")?,
            min_credit_score: row.try_get("min_credit_score")?,
            min_time_in_business: row.try_get("min_time_in_business")?,
            min_monthly_revenue: row.try_get("min_monthly_revenue")?,
            min_equipment_cost: row.try_get("min_equipment_cost")?,
            max_equipment_cost: row.try_get("max_equipment_cost")?,
            equipment_types: row.try_get("equipment_types")?,
            industries_accepted: row.try_get("industries_accepted")?,
            industries_restricted: row.try_get("industries_restricted")?,
            funding_speed: row.try_get("funding_speed")?,
            rate_range: row.try_get("rate_range")?,
            term_range: row.try_get("term_range")?,
            advance_rate: row.try_get("advance_rate")?,
        }))
    }

    /// Delete-then-insert inside one transaction
    ///
    /// Any error drops the transaction, which rolls it back.
    async fn replace_matches(&self, client_id: i64, matches: &[LenderMatch]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM matches WHERE client_id = $1")
            .bind(client_id)
            .execute(&mut *tx)
            .await?;

        let insert = r#"
            INSERT INTO matches (client_id, lender_id, match_score, match_details, created_at)
            VALUES ($1, $2, $3, $4, NOW())
        "#;

        for m in matches {
            sqlx::query(insert)
                .bind(client_id)
                .bind(m.lender_id)
                .bind(m.match_score)
                .bind(Json(&m.match_details))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            "Replaced matches for client {}: {} removed, {} inserted",
            client_id,
            deleted.rows_affected(),
            matches.len()
        );

        Ok(())
    }

    async fn create_client(&self, client: &ClientFields) -> Result<i64, StoreError> {
        let query = r#"
            INSERT INTO clients (
                business_name, industry, time_in_business, monthly_revenue,
                equipment_type, equipment_cost, credit_score, interested_in_wc,
                contact_email, contact_phone, notes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())
            RETURNING client_id
        "#;

        let row = sqlx::query(query)
            .bind(&client.business_name)
            .bind(&client.industry)
            .bind(&client.time_in_business)
            .bind(&client.monthly_revenue)
            .bind(&client.equipment_type)
            .bind(&client.equipment_cost)
            .bind(&client.credit_score)
            .bind(&client.interested_in_working_capital)
            .bind(&client.contact_email)
            .bind(&client.contact_phone)
            .bind(&client.notes)
            .fetch_one(&self.pool)
            .await?;

        let client_id: i64 = row.try_get("client_id")?;
        tracing::debug!("Created client {}", client_id);

        Ok(client_id)
    }

    async fn get_client(&self, client_id: i64) -> Result<Option<Client>, StoreError> {
        let query = r#"
            SELECT client_id, business_name, industry, time_in_business, monthly_revenue,
                   equipment_type, equipment_cost, credit_score, interested_in_wc,
                   contact_email, contact_phone, notes, created_at
            FROM clients
            WHERE client_id = $1
        "#;

        let Some(row) = sqlx::query(query)
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(Client {
            client_id: row.try_get("client_id")?,
            fields: ClientFields {
                business_name: row.try_get("business_name")?,
                industry: row.try_get("industry")?,
                time_in_business: row.try_get("time_in_business")?,
                monthly_revenue: row.try_get("monthly_revenue")?,
                equipment_type: row.try_get("equipment_type")?,
                equipment_cost: row.try_get("equipment_cost")?,
                credit_score: row.try_get("credit_score")?,
                interested_in_working_capital: row.try_get("interested_in_wc")?,
                contact_email: row.try_get("contact_email")?,
                contact_phone: row.try_get("contact_phone")?,
                notes: row.try_get("notes")?,
            },
            created_at: row.try_get("created_at")?,
        }))
    }

    async fn get_lender(&self, lender_id: i64) -> Result<Option<Lender>, StoreError> {
        let query = r#"
            SELECT lender_id, name, program_type, description, website,
                   contact_email, contact_phone, active
            FROM lenders
            WHERE lender_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(lender_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(lender_from_row).transpose()?)
    }

    async fn list_matches(&self, client_id: i64) -> Result<Vec<StoredMatch>, StoreError> {
        let query = r#"
            SELECT client_id, lender_id, match_score, match_details, created_at
            FROM matches
            WHERE client_id = $1
            ORDER BY match_score DESC, match_id ASC
        "#;

        let rows = sqlx::query(query).bind(client_id).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(stored_match_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
