use axum::{
    extract::{FromRequest, Request},
    Json,
};

use crate::handlers::ApiError;

/// JSON extractor whose rejection speaks the API's error dialect instead of
/// axum's plain-text default.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: serde::de::DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| AppJson(value))
            .map_err(|rejection| {
                tracing::warn!("Rejected request body: {}", rejection);
                ApiError::bad_request(format!("Invalid JSON body: {}", rejection))
            })
    }
}
