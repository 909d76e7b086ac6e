use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::MatchingEngine;
use crate::models::{
    ClientMatchesResponse, ErrorResponse, HealthResponse, SubmitClientRequest,
    SubmitClientResponse,
};
use crate::services::LenderStore;

/// Application state shared across all handlers
pub struct AppState<S> {
    pub engine: Arc<MatchingEngine<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<S: LenderStore> AppState<S> {
    pub fn new(engine: MatchingEngine<S>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Build a 500 response for a failed store call
pub(crate) fn store_failure(error: &str, cause: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: error.to_string(),
        message: cause.to_string(),
        status_code: 500,
    })
}

/// Configure client and match routes
pub fn configure<S: LenderStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check::<S>))
        .route("/clients", web::post().to(submit_client::<S>))
        .route("/clients/{client_id}/matches", web::get().to(get_client_matches::<S>));
}

/// Health check endpoint
async fn health_check<S: LenderStore + 'static>(state: web::Data<AppState<S>>) -> impl Responder {
    let store_healthy = state.engine.store().health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Submit a client and match it against the lender panel
///
/// POST /api/v1/clients
///
/// Request body:
/// ```json
/// {
///   "businessName": "Acme Paving",
///   "creditScore": "650-700",
///   "timeInBusiness": "2 years",
///   "equipmentType": "Paver",
///   "equipmentCost": "$45,000",
///   "industry": "Construction",
///   "interestedInWorkingCapital": "Yes"
/// }
/// ```
async fn submit_client<S: LenderStore + 'static>(
    state: web::Data<AppState<S>>,
    req: web::Json<SubmitClientRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for client submission: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let blank = req.blank_required_fields();
    if let Some(field) = blank.first() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: format!("Please provide {}", field),
            status_code: 400,
        });
    }

    let fields = req.into_inner().into_fields();

    match state.engine.submit_client(fields).await {
        Ok(submission) => {
            if !submission.saved {
                tracing::warn!(
                    "Returning unsaved matches for client {}",
                    submission.client_id
                );
            }

            HttpResponse::Created().json(SubmitClientResponse {
                client_id: submission.client_id,
                matches: submission.matches,
                saved: submission.saved,
            })
        }
        Err(e) => {
            tracing::error!("Failed to process client submission: {}", e);
            store_failure("Failed to process client", e)
        }
    }
}

/// Get the stored match set for a client
///
/// GET /api/v1/clients/{client_id}/matches
async fn get_client_matches<S: LenderStore + 'static>(
    state: web::Data<AppState<S>>,
    path: web::Path<i64>,
) -> impl Responder {
    let client_id = path.into_inner();
    let store = state.engine.store();

    match store.get_client(client_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Client not found".to_string(),
                message: format!("No client with id {}", client_id),
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch client {}: {}", client_id, e);
            return store_failure("Failed to fetch client", e);
        }
    }

    match store.list_matches(client_id).await {
        Ok(matches) => HttpResponse::Ok().json(ClientMatchesResponse {
            client_id,
            count: matches.len(),
            matches,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch matches for client {}: {}", client_id, e);
            store_failure("Failed to fetch matches", e)
        }
    }
}
