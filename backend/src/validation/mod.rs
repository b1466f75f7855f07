//! Input validation for request payloads.
//!
//! `ValidJson` deserializes and validates a JSON body in one step, so handlers
//! only ever see payloads that passed their `validator` rules.

pub mod rules;

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
pub use validator::Validate;

use crate::error::AppError;

/// JSON body extractor that rejects malformed or invalid payloads with
/// `AppError::Validation`, before the handler runs.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}
