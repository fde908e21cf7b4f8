// Route exports
pub mod errors;
pub mod matches;

use actix_web::web;
use crate::services::ItemSource;

pub use errors::configure_extractors;
pub use matches::AppState;

pub fn configure_routes<S: ItemSource>(cfg: &mut web::ServiceConfig) {
    configure_extractors(cfg);
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure::<S>),
    );
}
