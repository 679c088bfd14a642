use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::models::address::Address;

pub const CALLER_HEADER: &str = "x-caller-address";

/// Address of the account signing a write, as supplied by the wallet layer.
pub struct Caller(pub Address);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or_else(|| AppError::BadRequest(format!("missing {CALLER_HEADER} header")))?
            .to_str()
            .map_err(|_| AppError::BadRequest(format!("{CALLER_HEADER} is not valid text")))?;

        raw.trim().parse().map(Caller)
    }
}
