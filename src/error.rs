use mongodb::{bson::oid::Error as OidError, error::Error as DbError};
use rocket::{
    http::Status,
    response::{self, Responder},
    serde::json::Json,
    Request,
};
use serde::Serialize;
use thiserror::Error;

use crate::model::mongodb::is_duplicate_key_error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(DbError),
    #[error(transparent)]
    OidParse(#[from] OidError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl Error {
    /// Shorthand for a `NotFound` error about the given entity.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Shorthand for an `InvalidArgument` error.
    pub fn invalid(why: impl Into<String>) -> Self {
        Self::InvalidArgument(why.into())
    }

    /// Shorthand for a `Conflict` error.
    pub fn conflict(why: impl Into<String>) -> Self {
        Self::Conflict(why.into())
    }

    /// The HTTP status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::Db(_) => Status::InternalServerError,
            Self::OidParse(_) | Self::InvalidArgument(_) => Status::BadRequest,
            Self::NotFound(_) => Status::NotFound,
            Self::Conflict(_) => Status::Conflict,
        }
    }
}

impl From<DbError> for Error {
    fn from(err: DbError) -> Self {
        // Unique index violations are caller errors, not server failures.
        if is_duplicate_key_error(&err) {
            Self::Conflict(err.to_string())
        } else {
            Self::Db(err)
        }
    }
}

/// JSON body sent alongside an error status.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        if status == Status::InternalServerError {
            error!("{self}");
        } else {
            debug!("{self}");
        }
        // Never leak database internals to the caller.
        let message = match self {
            Self::Db(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        (status, Json(ErrorBody { message })).respond_to(req)
    }
}
