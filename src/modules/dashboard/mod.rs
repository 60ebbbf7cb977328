//! Read-only aggregates: a host view over the host's own venues and an
//! admin view over the whole marketplace.

pub mod stats;

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;

use venuehub_http::error::AppError;
use venuehub_http::extract::CurrentUser;
use venuehub_kernel::{AppContext, Module};
use venuehub_store::models::Role;

use stats::{AdminStats, HostStats, StatusCounts};

pub struct DashboardModule {
    ctx: AppContext,
}

impl DashboardModule {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Module for DashboardModule {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/host", get(host_dashboard))
            .route("/admin", get(admin_dashboard))
            .with_state(self.ctx.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/host": {
                    "get": {
                        "summary": "Aggregates over the host's venues and bookings",
                        "tags": ["Dashboard"],
                        "responses": {
                            "200": { "description": "Host stats" },
                            "403": { "description": "Host role required" }
                        }
                    }
                },
                "/admin": {
                    "get": {
                        "summary": "Marketplace-wide aggregates",
                        "tags": ["Dashboard"],
                        "responses": {
                            "200": { "description": "Admin stats" },
                            "403": { "description": "Admin role required" }
                        }
                    }
                }
            }
        }))
    }
}

async fn host_dashboard(
    State(ctx): State<AppContext>,
    user: CurrentUser,
) -> Result<Json<HostStats>, AppError> {
    user.require_host()?;

    let venues = ctx.store.venues_by_host(user.profile_id).await;
    let bookings = ctx.store.bookings_for_host(user.profile_id).await;

    // Review-weighted mean across every venue the host lists.
    let mut rating_sum = 0.0;
    let mut review_count = 0;
    for venue in &venues {
        let (average, count) = ctx.store.rating_summary(venue.id).await;
        rating_sum += average * count as f64;
        review_count += count;
    }
    let average_rating = if review_count == 0 {
        0.0
    } else {
        rating_sum / review_count as f64
    };

    Ok(Json(HostStats {
        total_venues: venues.len(),
        active_venues: venues.iter().filter(|v| v.is_active).count(),
        total_bookings: bookings.len(),
        bookings_by_status: StatusCounts::tally(&bookings),
        average_rating,
        monthly_revenue: stats::monthly_revenue(&bookings, Utc::now()),
    }))
}

async fn admin_dashboard(
    State(ctx): State<AppContext>,
    user: CurrentUser,
) -> Result<Json<AdminStats>, AppError> {
    user.require_admin()?;

    let bookings = ctx.store.all_bookings().await;

    Ok(Json(AdminStats {
        total_users: ctx.store.count_profiles().await,
        total_hosts: ctx.store.count_profiles_with_role(Role::Host).await,
        total_venues: ctx.store.count_venues().await,
        active_venues: ctx.store.count_active_venues().await,
        total_bookings: bookings.len(),
        pending_bookings: stats::pending_count(&bookings),
        total_revenue: stats::total_revenue(&bookings),
        monthly_revenue: stats::monthly_revenue(&bookings, Utc::now()),
    }))
}

/// Create a new instance of the dashboard module.
pub fn create_module(ctx: AppContext) -> Arc<dyn Module> {
    Arc::new(DashboardModule::new(ctx))
}
