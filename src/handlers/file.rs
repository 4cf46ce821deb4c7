use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::utils::file_store::FileStore;

pub async fn serve_upload(
    store: web::Data<FileStore>,
    filename: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let bytes = store.resolve(&filename).await?;

    let content_type = infer::get(&bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream");

    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}
