use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

/// Sub-record of an onboarding submission, used to tag write and parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    PersonalInfo,
    GovernmentIds,
    PreviousEmployment,
    Address,
    BankDetails,
    Education,
    Employment,
    Signature,
}

impl Section {
    pub fn insert_message(&self) -> &'static str {
        match self {
            Section::PersonalInfo => "Error inserting personal info",
            Section::GovernmentIds => "Error inserting government IDs",
            Section::PreviousEmployment => "Error inserting previous employment",
            Section::Address => "Error inserting address",
            Section::BankDetails => "Error inserting bank details",
            Section::Education => "Error inserting education details",
            Section::Employment => "Error inserting employment details",
            Section::Signature => "Error inserting signature",
        }
    }

    pub fn parse_message(&self) -> &'static str {
        match self {
            Section::Education => "Error parsing education details",
            Section::Employment => "Error parsing employment details",
            _ => "Error parsing form data",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::PersonalInfo => "personal info",
            Section::GovernmentIds => "government ids",
            Section::PreviousEmployment => "previous employment",
            Section::Address => "address",
            Section::BankDetails => "bank details",
            Section::Education => "education",
            Section::Employment => "employment history",
            Section::Signature => "signature",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    TransactionError(String),
    SectionWriteError(Section, String),
    CommitError(String),
    ParseError(Section, String),
    /// Client-facing message, then the underlying cause.
    QueryError(&'static str, String),
    StorageError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    /// Message sent to the client. Driver details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::TransactionError(_) => "Transaction Error".to_string(),
            AppError::SectionWriteError(section, _) => section.insert_message().to_string(),
            AppError::CommitError(_) => "Commit Error".to_string(),
            AppError::ParseError(section, _) => section.parse_message().to_string(),
            AppError::QueryError(msg, _) => msg.to_string(),
            AppError::StorageError(_) => "Error storing uploaded file".to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::TransactionError(msg) => write!(f, "Transaction Error: {}", msg),
            AppError::SectionWriteError(section, msg) => {
                write!(f, "Write Error ({}): {}", section, msg)
            }
            AppError::CommitError(msg) => write!(f, "Commit Error: {}", msg),
            AppError::ParseError(section, msg) => write!(f, "Parse Error ({}): {}", section, msg),
            AppError::QueryError(context, msg) => write!(f, "Query Error ({}): {}", context, msg),
            AppError::StorageError(msg) => write!(f, "Storage Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = ErrorResponse { error: self.public_message() };
        match self {
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(body),
            AppError::NotFound(_) => HttpResponse::NotFound().json(body),
            _ => {
                log::error!("{}", self);
                HttpResponse::InternalServerError().json(body)
            }
        }
    }
}
