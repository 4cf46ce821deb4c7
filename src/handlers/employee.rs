use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::db::employees;
use crate::errors::AppError;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
pub struct StatusUpdate {
    #[validate(length(min = 1))]
    status: String,
}

pub async fn get_employees(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let employees = employees::list_all(&pool).await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn update_status(
    pool: web::Data<PgPool>,
    employee_id: web::Path<i32>,
    update: web::Json<StatusUpdate>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&update.0)?;

    let employee_id = employee_id.into_inner();
    let updated = employees::set_status(&pool, employee_id, &update.status).await?;
    if updated == 0 {
        log::warn!("Status update for employee {} matched no signature record", employee_id);
    } else {
        log::info!("Employee {} status set to {}", employee_id, update.status);
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Status updated successfully",
    })))
}

// Unauthenticated and irreversible. Uploaded files stay on disk.
pub async fn delete_employees(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    employees::clear_all(&pool).await?;
    log::info!("All onboarding records cleared");

    Ok(HttpResponse::Ok().json(json!({
        "message": "All records cleared successfully",
    })))
}
