//! Custom Axum extractors.
//!
//! - `CorrelationId`: extract or generate request correlation IDs
//! - `AuthPrincipal`: the principal attached by the fronting identity layer
//!
//! # Examples
//!
//! ```ignore
//! async fn handler(
//!     AuthPrincipal(principal): AuthPrincipal,
//!     correlation_id: CorrelationId,
//! ) -> Result<Json<Response>, AppError> {
//!     tracing::info!(
//!         correlation_id = %correlation_id.0,
//!         user_id = %principal.id,
//!         "Processing request"
//!     );
//!     Ok(Json(response))
//! }
//! ```

use crate::error::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use stockroom_core::{Principal, Role, UserId};
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Extracts the correlation ID from the `X-Correlation-ID` header,
/// or generates a new UUID v4 if not present.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let correlation_id = parts
            .headers
            .get("X-Correlation-ID")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

/// The authenticated principal for this request.
///
/// Identity verification happens upstream; the identity layer forwards the
/// verified user as two headers, `X-User-Id` (UUID) and `X-User-Role`
/// (`admin` | `manager` | `staff`). Requests missing either header, or
/// carrying values that do not parse, are rejected with 401.
#[derive(Debug, Clone, Copy)]
pub struct AuthPrincipal(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(UserId::from_uuid)
            .ok_or_else(|| AppError::unauthorized("Missing or invalid X-User-Id header"))?;

        let role = parts
            .headers
            .get("X-User-Role")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Role>().ok())
            .ok_or_else(|| AppError::unauthorized("Missing or invalid X-User-Role header"))?;

        Ok(Self(Principal::new(user_id, role)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_of(req: Request<()>) -> Parts {
        req.into_parts().0
    }

    #[tokio::test]
    async fn test_correlation_id_from_header() {
        let uuid = Uuid::new_v4();
        let req = Request::builder()
            .header("X-Correlation-ID", uuid.to_string())
            .body(())
            .expect("Valid request");

        let mut parts = parts_of(req);
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(correlation_id.0, uuid);
    }

    #[tokio::test]
    async fn test_correlation_id_generates_new() {
        let req = Request::builder().body(()).expect("Valid request");

        let mut parts = parts_of(req);
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_ne!(correlation_id.0, Uuid::nil());
    }

    #[tokio::test]
    async fn test_principal_from_headers() {
        let id = Uuid::new_v4();
        let req = Request::builder()
            .header("X-User-Id", id.to_string())
            .header("X-User-Role", "manager")
            .body(())
            .expect("Valid request");

        let mut parts = parts_of(req);
        let AuthPrincipal(principal) = AuthPrincipal::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(principal.id, UserId::from_uuid(id));
        assert_eq!(principal.role, Role::Manager);
    }

    #[tokio::test]
    async fn test_missing_identity_is_rejected() {
        let req = Request::builder().body(()).expect("Valid request");
        let mut parts = parts_of(req);
        assert!(
            AuthPrincipal::from_request_parts(&mut parts, &())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected() {
        let req = Request::builder()
            .header("X-User-Id", Uuid::new_v4().to_string())
            .header("X-User-Role", "root")
            .body(())
            .expect("Valid request");

        let mut parts = parts_of(req);
        assert!(
            AuthPrincipal::from_request_parts(&mut parts, &())
                .await
                .is_err()
        );
    }
}
