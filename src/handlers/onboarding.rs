use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

use crate::config::Config;
use crate::db::onboarding::{self, StoredFiles};
use crate::errors::AppError;
use crate::models::onboarding::OnboardingForm;
use crate::utils::file_store::FileStore;
use crate::utils::multipart::read_form;
use crate::utils::upload_schema::validate_slots;

pub async fn submit_onboarding(
    pool: web::Data<PgPool>,
    store: web::Data<FileStore>,
    config: web::Data<Config>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let (fields, uploads) = read_form(payload, config.max_body_bytes).await?;
    let form = OnboardingForm::from_fields(&fields)?;
    validate_slots(
        uploads.iter().map(|upload| &upload.slot),
        form.education.len(),
        form.employment.len(),
    )?;

    let mut stored = StoredFiles::new();
    for upload in &uploads {
        let path = store
            .store(&upload.slot.field_name(), &upload.original_filename, &upload.bytes)
            .await?;
        stored.insert(upload.slot, path);
    }

    let employee_id = onboarding::submit(&pool, &form, &stored).await?;
    log::info!(
        "Onboarding submitted for employee {} ({} education, {} employment, {} files)",
        employee_id,
        form.education.len(),
        form.employment.len(),
        stored.len()
    );

    Ok(HttpResponse::Ok().json(json!({
        "message": "Form submitted successfully",
        "employeeId": employee_id,
    })))
}
