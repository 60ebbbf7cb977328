//! Sign-up, sign-in, sign-out, and the current-profile view. The session
//! caches the role claim at issue time; editing a profile's role only takes
//! effect at the next sign-in.

pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use venuehub_http::error::{AppError, FieldError};
use venuehub_http::extract::CurrentUser;
use venuehub_kernel::{AppContext, Module};
use venuehub_store::models::{NewProfile, Role};

use models::{MeResponse, ProfileResponse, SessionResponse, SigninRequest, SignupRequest};

const MIN_PASSWORD_LEN: usize = 8;

pub struct AccountsModule {
    ctx: AppContext,
}

impl AccountsModule {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Module for AccountsModule {
    fn name(&self) -> &'static str {
        "accounts"
    }

    async fn init(&self, ctx: &AppContext) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            session_ttl_minutes = ctx.settings.auth.session_ttl_minutes,
            "accounts module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/signup", post(signup))
            .route("/signin", post(signin))
            .route("/signout", post(signout))
            .route("/me", get(me))
            .with_state(self.ctx.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/signup": {
                    "post": {
                        "summary": "Register a profile and open a session",
                        "tags": ["Accounts"],
                        "responses": {
                            "201": { "description": "Session issued" },
                            "409": { "description": "Email already registered" },
                            "422": { "description": "Field validation failed" }
                        }
                    }
                },
                "/signin": {
                    "post": {
                        "summary": "Exchange credentials for a bearer token",
                        "tags": ["Accounts"],
                        "responses": {
                            "200": { "description": "Session issued" },
                            "400": { "description": "Invalid email or password" }
                        }
                    }
                },
                "/signout": {
                    "post": {
                        "summary": "Revoke the current session",
                        "tags": ["Accounts"],
                        "responses": { "204": { "description": "Session revoked" } }
                    }
                },
                "/me": {
                    "get": {
                        "summary": "Current profile with derived role flags",
                        "tags": ["Accounts"],
                        "responses": {
                            "200": { "description": "Profile" },
                            "401": { "description": "Not signed in" }
                        }
                    }
                }
            }
        }))
    }
}

fn validate_signup(req: &SignupRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if req.email.trim().is_empty() || !req.email.contains('@') {
        errors.push(FieldError::new("email", "a valid email address is required"));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    if req.full_name.trim().is_empty() {
        errors.push(FieldError::new("full_name", "full name is required"));
    }
    if req.role == Role::Admin {
        errors.push(FieldError::new("role", "admin accounts cannot self-register"));
    }
    errors
}

async fn signup(
    State(ctx): State<AppContext>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let errors = validate_signup(&req);
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let password_hash = venuehub_auth::hash_password(&req.password)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    let profile = ctx
        .store
        .create_profile(NewProfile {
            email: req.email,
            full_name: req.full_name,
            phone: req.phone,
            role: req.role,
            password_hash,
        })
        .await?;

    let session = ctx.sessions.issue(profile.id, profile.role).await;
    tracing::info!(profile = %profile.id, role = ?profile.role, "profile registered");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token: session.token,
            expires_at: session.expires_at,
            profile: profile.into(),
        }),
    ))
}

async fn signin(
    State(ctx): State<AppContext>,
    Json(req): Json<SigninRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let profile = ctx
        .store
        .profile_by_email(&req.email)
        .await
        .filter(|p| venuehub_auth::verify_password(&req.password, &p.password_hash))
        .ok_or_else(|| AppError::bad_request("invalid email or password"))?;

    let session = ctx.sessions.issue(profile.id, profile.role).await;

    Ok(Json(SessionResponse {
        token: session.token,
        expires_at: session.expires_at,
        profile: profile.into(),
    }))
}

async fn signout(State(ctx): State<AppContext>, user: CurrentUser) -> StatusCode {
    ctx.sessions.revoke(&user.token).await;
    StatusCode::NO_CONTENT
}

async fn me(State(ctx): State<AppContext>, user: CurrentUser) -> Result<Json<MeResponse>, AppError> {
    let profile = ctx
        .store
        .profile(user.profile_id)
        .await
        .ok_or_else(|| AppError::not_found("profile not found"))?;

    Ok(Json(MeResponse {
        profile: ProfileResponse::from(profile),
        role: user.role,
        is_admin: user.role.is_admin(),
        is_host: user.role.is_host(),
    }))
}

/// Create a new instance of the accounts module.
pub fn create_module(ctx: AppContext) -> Arc<dyn Module> {
    Arc::new(AccountsModule::new(ctx))
}
