//! Venue listings and host-side venue management. Listing and detail are
//! public; writes require the host role, and a venue is only ever
//! soft-deactivated, never removed.

pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use uuid::Uuid;

use venuehub_http::error::{AppError, FieldError};
use venuehub_http::extract::CurrentUser;
use venuehub_kernel::{AppContext, Module};
use venuehub_store::models::{NewVenue, Venue};

use models::{CreateVenueRequest, UpdateVenueRequest, VenueQuery, VenueResponse};

pub struct VenuesModule {
    ctx: AppContext,
}

impl VenuesModule {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Module for VenuesModule {
    fn name(&self) -> &'static str {
        "venues"
    }

    async fn init(&self, _ctx: &AppContext) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "venues module initialized");
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_venues).post(create_venue))
            .route("/mine", get(my_venues))
            .route(
                "/{id}",
                get(get_venue).patch(update_venue).delete(deactivate_venue),
            )
            .with_state(self.ctx.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List active venues",
                        "tags": ["Venues"],
                        "parameters": [
                            { "name": "city", "in": "query", "schema": { "type": "string" } },
                            { "name": "category", "in": "query", "schema": { "type": "string" } },
                            { "name": "min_capacity", "in": "query", "schema": { "type": "integer" } },
                            { "name": "max_price", "in": "query", "schema": { "type": "number" } }
                        ],
                        "responses": { "200": { "description": "Venues with rating aggregates" } }
                    },
                    "post": {
                        "summary": "Create a venue",
                        "tags": ["Venues"],
                        "responses": {
                            "201": { "description": "Venue created" },
                            "403": { "description": "Host role required" },
                            "422": { "description": "Field validation failed" }
                        }
                    }
                },
                "/mine": {
                    "get": {
                        "summary": "The host's own venues, active or not",
                        "tags": ["Venues"],
                        "responses": { "200": { "description": "Venues" } }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Venue detail",
                        "tags": ["Venues"],
                        "responses": {
                            "200": { "description": "Venue" },
                            "404": { "description": "Unknown venue" }
                        }
                    },
                    "patch": {
                        "summary": "Update a venue (owner or admin)",
                        "tags": ["Venues"],
                        "responses": { "200": { "description": "Updated venue" } }
                    },
                    "delete": {
                        "summary": "Soft-deactivate a venue (owner or admin)",
                        "tags": ["Venues"],
                        "responses": { "204": { "description": "Venue deactivated" } }
                    }
                }
            }
        }))
    }
}

fn validate_create(req: &CreateVenueRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if req.name.trim().is_empty() {
        errors.push(FieldError::new("name", "name is required"));
    }
    if req.address.trim().is_empty() {
        errors.push(FieldError::new("address", "address is required"));
    }
    if req.city.trim().is_empty() {
        errors.push(FieldError::new("city", "city is required"));
    }
    if req.capacity == 0 {
        errors.push(FieldError::new("capacity", "capacity must be at least 1"));
    }
    if req.price_per_hour < 0.0 || !req.price_per_hour.is_finite() {
        errors.push(FieldError::new(
            "price_per_hour",
            "hourly price must be a non-negative number",
        ));
    }
    errors
}

/// Owner-or-admin write guard shared by update and deactivate.
fn authorize_write(venue: &Venue, user: &CurrentUser) -> Result<(), AppError> {
    if venue.host_id == user.profile_id || user.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden("only the owning host or an admin may modify this venue"))
    }
}

async fn with_rating(ctx: &AppContext, venue: Venue) -> VenueResponse {
    let (average_rating, review_count) = ctx.store.rating_summary(venue.id).await;
    VenueResponse {
        venue,
        average_rating,
        review_count,
    }
}

async fn list_venues(
    State(ctx): State<AppContext>,
    Query(query): Query<VenueQuery>,
) -> Json<Vec<VenueResponse>> {
    let rows = ctx.store.venues_filtered(&query.into()).await;
    let mut out = Vec::with_capacity(rows.len());
    for venue in rows {
        out.push(with_rating(&ctx, venue).await);
    }
    Json(out)
}

async fn get_venue(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<VenueResponse>, AppError> {
    let venue = ctx
        .store
        .venue(id)
        .await
        .ok_or_else(|| AppError::not_found("venue not found"))?;
    Ok(Json(with_rating(&ctx, venue).await))
}

async fn my_venues(State(ctx): State<AppContext>, user: CurrentUser) -> Result<Json<Vec<Venue>>, AppError> {
    user.require_host()?;
    Ok(Json(ctx.store.venues_by_host(user.profile_id).await))
}

async fn create_venue(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Json(req): Json<CreateVenueRequest>,
) -> Result<(StatusCode, Json<Venue>), AppError> {
    user.require_host()?;

    let errors = validate_create(&req);
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let venue = ctx
        .store
        .create_venue(NewVenue {
            host_id: user.profile_id,
            name: req.name,
            description: req.description,
            category: req.category,
            address: req.address,
            city: req.city,
            postal_code: req.postal_code,
            latitude: req.latitude,
            longitude: req.longitude,
            capacity: req.capacity,
            price_per_hour: req.price_per_hour,
            images: req.images,
            amenities: req.amenities,
            rules: req.rules,
        })
        .await;

    tracing::info!(venue = %venue.id, host = %venue.host_id, "venue created");
    Ok((StatusCode::CREATED, Json(venue)))
}

async fn update_venue(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateVenueRequest>,
) -> Result<Json<Venue>, AppError> {
    let venue = ctx
        .store
        .venue(id)
        .await
        .ok_or_else(|| AppError::not_found("venue not found"))?;
    authorize_write(&venue, &user)?;

    if req.capacity == Some(0) {
        return Err(AppError::validation(vec![FieldError::new(
            "capacity",
            "capacity must be at least 1",
        )]));
    }
    if matches!(req.price_per_hour, Some(p) if p < 0.0 || !p.is_finite()) {
        return Err(AppError::validation(vec![FieldError::new(
            "price_per_hour",
            "hourly price must be a non-negative number",
        )]));
    }

    let updated = ctx
        .store
        .modify_venue(id, |v| {
            if let Some(name) = req.name {
                v.name = name;
            }
            if let Some(description) = req.description {
                v.description = Some(description);
            }
            if let Some(category) = req.category {
                v.category = Some(category);
            }
            if let Some(address) = req.address {
                v.address = address;
            }
            if let Some(city) = req.city {
                v.city = city;
            }
            if let Some(postal_code) = req.postal_code {
                v.postal_code = Some(postal_code);
            }
            if let Some(capacity) = req.capacity {
                v.capacity = capacity;
            }
            if let Some(price) = req.price_per_hour {
                v.price_per_hour = price;
            }
            if let Some(images) = req.images {
                v.images = images;
            }
            if let Some(amenities) = req.amenities {
                v.amenities = amenities;
            }
            if let Some(rules) = req.rules {
                v.rules = Some(rules);
            }
            if let Some(is_active) = req.is_active {
                v.is_active = is_active;
            }
        })
        .await?;

    Ok(Json(updated))
}

async fn deactivate_venue(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let venue = ctx
        .store
        .venue(id)
        .await
        .ok_or_else(|| AppError::not_found("venue not found"))?;
    authorize_write(&venue, &user)?;

    ctx.store.modify_venue(id, |v| v.is_active = false).await?;
    tracing::info!(venue = %id, "venue deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// Create a new instance of the venues module.
pub fn create_module(ctx: AppContext) -> Arc<dyn Module> {
    Arc::new(VenuesModule::new(ctx))
}
