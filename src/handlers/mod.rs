pub mod employee;
pub mod file;
pub mod onboarding;

use actix_web::web;

use crate::errors::AppError;
use crate::utils::file_store::PUBLIC_PREFIX;

/// JSON body extractor settings. Rejected bodies get the usual `{"error": ...}` shape.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Registers every route. Expects `PgPool`, `FileStore` and `Config` as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/submit-onboarding")
            .route(web::post().to(onboarding::submit_onboarding)),
    )
    .service(
        web::resource("/api/employees")
            .route(web::get().to(employee::get_employees))
            .route(web::delete().to(employee::delete_employees)),
    )
    .service(
        web::resource("/api/employees/{id}/status")
            .route(web::put().to(employee::update_status)),
    )
    .service(
        web::resource(format!("{}/{{filename}}", PUBLIC_PREFIX))
            .route(web::get().to(file::serve_upload)),
    );
}
