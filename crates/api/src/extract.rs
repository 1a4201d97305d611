//! Validating extractors.
//!
//! [`ValidatedJson`] and [`ValidatedQuery`] deserialize like axum's `Json`
//! and `Query`, then run the type's `validator` rules. Both kinds of
//! failure become [`AppError::Malformed`], a 400 with one
//! `"field: message"` line per problem. [`ValidatedPath`] does the same for
//! path parameters, which have no rules beyond parsing.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use praxis_core::validation::ValidationError;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

fn check<T: Validate>(value: &T) -> Result<(), AppError> {
    value
        .validate()
        .map_err(|errors| AppError::Malformed(ValidationError::from(&errors).messages()))
}

/// A JSON body that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Malformed(vec![rejection.body_text()]))?;
        check(&value)?;
        Ok(ValidatedJson(value))
    }
}

/// Query parameters that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Malformed(vec![rejection.body_text()]))?;
        check(&value)?;
        Ok(ValidatedQuery(value))
    }
}

/// Path parameters that parsed, e.g. a UUID id.
#[derive(Debug, Clone)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Malformed(vec![rejection.body_text()]))?;
        Ok(ValidatedPath(value))
    }
}
