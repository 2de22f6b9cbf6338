//! Extractors that reject with [`AppError`] so every failure gets the
//! uniform error body.

use axum::{
    extract::{FromRequest, FromRequestParts, Json, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::dtos::Validate;
use crate::error::AppError;

/// JSON body that has been deserialized and validated. Holds the validated
/// form (`T::Valid`), so handlers never see an unchecked body.
pub struct ValidatedJson<T: Validate>(pub T::Valid);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::malformed(rejection.body_text()))?;

        data.validate()
            .map(ValidatedJson)
            .map_err(AppError::Validation)
    }
}

/// Numeric `{id}` path segment.
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::malformed(rejection.body_text()))?;

        raw.parse::<i64>()
            .map(IdPath)
            .map_err(|_| AppError::malformed(format!("Invalid id: {raw}")))
    }
}
