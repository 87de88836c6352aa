//! Request extractors.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use attendance_core::limits::MAX_OPERATOR_LEN;

/// Operator identity from the `X-Operator` header.
///
/// Scanning stations send the staff member running the desk so scans can
/// be attributed. Absent or blank headers are fine; scans then record no
/// operator.
#[derive(Debug, Clone)]
pub struct Operator(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for Operator
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let operator = parts
            .headers
            .get("X-Operator")
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.chars().take(MAX_OPERATOR_LEN).collect());

        Ok(Operator(operator))
    }
}
