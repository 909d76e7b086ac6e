// Route exports
pub mod lenders;
pub mod matches;

use actix_web::web;

use crate::services::LenderStore;

pub use matches::AppState;

pub fn configure_routes<S: LenderStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure::<S>)
            .configure(lenders::configure::<S>),
    );
}
