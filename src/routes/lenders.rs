use actix_web::{web, HttpResponse, Responder};

use crate::models::{ErrorResponse, LenderDetailsResponse};
use crate::routes::matches::{store_failure, AppState};
use crate::services::LenderStore;

/// Configure lender lookup routes
pub fn configure<S: LenderStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/lenders", web::get().to(list_lenders::<S>))
        .route("/lenders/{lender_id}", web::get().to(get_lender_details::<S>));
}

/// GET /api/v1/lenders
async fn list_lenders<S: LenderStore + 'static>(state: web::Data<AppState<S>>) -> impl Responder {
    match state.engine.store().list_active_lenders().await {
        Ok(lenders) => HttpResponse::Ok().json(lenders),
        Err(e) => {
            tracing::error!("Failed to list lenders: {}", e);
            store_failure("Failed to list lenders", e)
        }
    }
}

/// Lender details with guidelines
///
/// GET /api/v1/lenders/{lender_id}
///
/// `guidelines` is null for a lender that has none; such a lender never
/// appears in match results.
async fn get_lender_details<S: LenderStore + 'static>(
    state: web::Data<AppState<S>>,
    path: web::Path<i64>,
) -> impl Responder {
    let lender_id = path.into_inner();
    let store = state.engine.store();

    let lender = match store.get_lender(lender_id).await {
        Ok(Some(lender)) => lender,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Lender not found".to_string(),
                message: format!("No lender with id {}", lender_id),
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch lender {}: {}", lender_id, e);
            return store_failure("Failed to fetch lender", e);
        }
    };

    match store.get_guidelines(lender_id).await {
        Ok(guidelines) => HttpResponse::Ok().json(LenderDetailsResponse { lender, guidelines }),
        Err(e) => {
            tracing::error!("Failed to fetch guidelines for lender {}: {}", lender_id, e);
            store_failure("Failed to fetch guidelines", e)
        }
    }
}
