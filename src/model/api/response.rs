use serde::Serialize;

use crate::model::db::Written;

/// The envelope every successful API response is wrapped in.
#[derive(Debug, Serialize)]
pub struct Response<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> Response<T> {
    /// A bare response without a message.
    pub fn data(data: T) -> Self {
        Self {
            message: None,
            data,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            message: Some(message.into()),
            data,
        }
    }
}

impl<R, T> From<Written<R>> for Response<T>
where
    R: Into<T>,
{
    fn from(written: Written<R>) -> Self {
        Self::with_message(written.message, written.record.into())
    }
}
