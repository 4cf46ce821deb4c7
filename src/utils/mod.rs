pub mod file_store;
pub mod multipart;
pub mod upload_schema;
pub mod validation;
