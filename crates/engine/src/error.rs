//! Errors the engine can return.
//!
//! The server maps these onto HTTP statuses: [`KeyNotFound`] is a 404,
//! [`Forbidden`] a 403, [`ExistingKey`] and [`CategoryInUse`] a 409,
//! [`InvalidField`] a 400, and [`Database`] a 500.
//!
//! [`KeyNotFound`]: EngineError::KeyNotFound
//! [`Forbidden`]: EngineError::Forbidden
//! [`ExistingKey`]: EngineError::ExistingKey
//! [`CategoryInUse`]: EngineError::CategoryInUse
//! [`InvalidField`]: EngineError::InvalidField
//! [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" not found!")]
    KeyNotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("invalid field: {0}")]
    InvalidField(String),
    #[error("category \"{0}\" is still in use")]
    CategoryInUse(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidField(a), Self::InvalidField(b)) => a == b,
            (Self::CategoryInUse(a), Self::CategoryInUse(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
