//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use venuehub_kernel::AppContext;
use venuehub_store::models::Role;

use crate::error::AppError;

/// The authenticated caller, resolved from the `Authorization: Bearer`
/// header against the session table. Missing, malformed, expired, or
/// revoked tokens all collapse into the same `auth_required` gate.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub profile_id: Uuid,
    pub role: Role,
    pub token: String,
}

impl CurrentUser {
    pub fn require_host(&self) -> Result<(), AppError> {
        if self.role.is_host() {
            Ok(())
        } else {
            Err(AppError::forbidden("host role required"))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("admin role required"))
        }
    }
}

impl FromRequestParts<AppContext> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::AuthRequired)?;

        let session = ctx
            .sessions
            .resolve(token)
            .await
            .ok_or(AppError::AuthRequired)?;

        Ok(CurrentUser {
            profile_id: session.profile_id,
            role: session.role,
            token: session.token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/favorites");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn missing_header_hits_the_gate() {
        let ctx = AppContext::default();
        let mut parts = parts_with_auth(None);
        let err = CurrentUser::from_request_parts(&mut parts, &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthRequired));
    }

    #[tokio::test]
    async fn unknown_token_hits_the_gate() {
        let ctx = AppContext::default();
        let mut parts = parts_with_auth(Some("Bearer deadbeef"));
        let err = CurrentUser::from_request_parts(&mut parts, &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthRequired));
    }

    #[tokio::test]
    async fn live_session_resolves_to_current_user() {
        let ctx = AppContext::default();
        let profile = Uuid::now_v7();
        let session = ctx.sessions.issue(profile, Role::Host).await;

        let header = format!("Bearer {}", session.token);
        let mut parts = parts_with_auth(Some(&header));
        let user = CurrentUser::from_request_parts(&mut parts, &ctx)
            .await
            .unwrap();
        assert_eq!(user.profile_id, profile);
        assert!(user.require_host().is_ok());
        assert!(user.require_admin().is_err());
    }
}
