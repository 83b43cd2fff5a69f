//! Error types for Elidune Desk

use thiserror::Error;

/// Operator-facing error codes, printed next to every failure message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    StorageFailure = 3,
    NoSuchMember = 4,
    NoSuchItem = 5,
    ItemNotAvailable = 7,
    Duplicate = 8,
    BadValue = 18,
    NoSuchData = 20,
    CorruptData = 22,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage unavailable for '{collection}': {source}")]
    StorageUnavailable {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Collection '{collection}' is corrupt: {message}")]
    CorruptCollection { collection: String, message: String },

    #[error("Invalid identifier format: '{0}'")]
    InvalidIdentifierFormat(String),

    #[error("Invalid timestamp: '{0}' (expected YYYY.MM.DD HH.MM.SS)")]
    InvalidTimestamp(String),

    #[error("Member {0} does not exist or is inactive")]
    UnknownOrInactiveMember(String),

    #[error("Item {0} does not exist, is inactive or is out of stock")]
    UnknownOrInactiveItem(String),

    #[error("Invalid term code {0} (expected 1, 2 or 3)")]
    InvalidTermCode(u8),

    #[error("Year {year} is out of range ({min}-{max})")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("Member {0} not found")]
    MemberNotFound(String),

    #[error("Item {0} not found")]
    ItemNotFound(String),

    #[error("Loan {0} not found")]
    LoanNotFound(String),

    #[error("A loan with id {0} already exists")]
    DuplicateLoanId(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Code shown to the operator alongside the message
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::StorageUnavailable { .. } => ErrorCode::StorageFailure,
            AppError::CorruptCollection { .. } => ErrorCode::CorruptData,
            AppError::InvalidIdentifierFormat(_) => ErrorCode::CorruptData,
            AppError::InvalidTimestamp(_) => ErrorCode::BadValue,
            AppError::UnknownOrInactiveMember(_) => ErrorCode::NoSuchMember,
            AppError::UnknownOrInactiveItem(_) => ErrorCode::ItemNotAvailable,
            AppError::InvalidTermCode(_) => ErrorCode::BadValue,
            AppError::YearOutOfRange { .. } => ErrorCode::BadValue,
            AppError::MemberNotFound(_) => ErrorCode::NoSuchMember,
            AppError::ItemNotFound(_) => ErrorCode::NoSuchItem,
            AppError::LoanNotFound(_) => ErrorCode::NoSuchData,
            AppError::DuplicateLoanId(_) => ErrorCode::Duplicate,
            AppError::Validation(_) => ErrorCode::BadValue,
        }
    }

    /// Storage failures abort the operation; everything else is a rejected request
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            AppError::StorageUnavailable { .. } | AppError::CorruptCollection { .. }
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
