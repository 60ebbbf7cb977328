//! Booking submission and lifecycle. The server quotes every submission
//! itself, rejects totals the client got wrong, and refuses windows that
//! overlap a pending or confirmed booking for the same venue.

pub mod models;
pub mod pricing;

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::json;
use uuid::Uuid;

use venuehub_events::DomainEvent;
use venuehub_http::error::AppError;
use venuehub_http::extract::CurrentUser;
use venuehub_kernel::{AppContext, Module};
use venuehub_store::models::{Booking, NewBooking};

use models::{BookingView, CreateBookingRequest, UpdateStatusRequest};

pub struct BookingsModule {
    ctx: AppContext,
}

impl BookingsModule {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Module for BookingsModule {
    fn name(&self) -> &'static str {
        "bookings"
    }

    async fn init(&self, ctx: &AppContext) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            min_duration_hours = ctx.settings.booking.min_duration_hours,
            "bookings module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", post(create_booking))
            .route("/mine", get(my_bookings))
            .route("/host", get(host_bookings))
            .route("/{id}/status", patch(update_status))
            .with_state(self.ctx.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Submit a booking request",
                        "tags": ["Bookings"],
                        "responses": {
                            "201": { "description": "Booking created as pending" },
                            "404": { "description": "Unknown or inactive venue" },
                            "409": { "description": "Overlapping booking or price mismatch" },
                            "422": { "description": "Field validation failed" }
                        }
                    }
                },
                "/mine": {
                    "get": {
                        "summary": "The guest's own bookings, newest window first",
                        "tags": ["Bookings"],
                        "responses": { "200": { "description": "Bookings" } }
                    }
                },
                "/host": {
                    "get": {
                        "summary": "Bookings across all of the host's venues",
                        "tags": ["Bookings"],
                        "responses": { "200": { "description": "Bookings" } }
                    }
                },
                "/{id}/status": {
                    "patch": {
                        "summary": "Move a booking through its lifecycle",
                        "tags": ["Bookings"],
                        "responses": {
                            "200": { "description": "Updated booking" },
                            "403": { "description": "Caller may not apply this change" },
                            "409": { "description": "Transition not allowed from the current status" }
                        }
                    }
                }
            }
        }))
    }
}

async fn venue_names(ctx: &AppContext, rows: Vec<Booking>) -> Vec<BookingView> {
    let mut out = Vec::with_capacity(rows.len());
    for booking in rows {
        let venue_name = ctx
            .store
            .venue(booking.venue_id)
            .await
            .map(|v| v.name)
            .unwrap_or_default();
        out.push(BookingView {
            booking,
            venue_name,
        });
    }
    out
}

async fn create_booking(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let venue = ctx
        .store
        .venue(req.venue_id)
        .await
        .filter(|v| v.is_active)
        .ok_or_else(|| AppError::not_found("venue not found"))?;

    let quote = pricing::quote(
        &req.form(),
        &venue,
        ctx.settings.booking.min_duration_hours,
    )
    .map_err(AppError::validation)?;

    // Never trust the client's arithmetic.
    if let Some(echoed) = req.total_price {
        if !pricing::totals_match(quote.total_price, echoed) {
            return Err(AppError::conflict(format!(
                "price changed: expected {:.2}, got {:.2}",
                quote.total_price, echoed
            )));
        }
    }

    let booking = ctx
        .store
        .create_booking(NewBooking {
            venue_id: venue.id,
            guest_id: user.profile_id,
            start_datetime: quote.start_datetime,
            end_datetime: quote.end_datetime,
            guest_count: req.guest_count,
            total_price: quote.total_price,
            special_requests: req.special_requests,
        })
        .await?;

    ctx.events.publish(DomainEvent::BookingCreated {
        booking_id: booking.id,
        venue_id: venue.id,
        venue_name: venue.name,
        host_id: venue.host_id,
        guest_id: user.profile_id,
    });

    tracing::info!(
        booking = %booking.id,
        venue = %booking.venue_id,
        total_price = booking.total_price,
        "booking created"
    );
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn my_bookings(
    State(ctx): State<AppContext>,
    user: CurrentUser,
) -> Json<Vec<BookingView>> {
    let rows = ctx.store.bookings_by_guest(user.profile_id).await;
    Json(venue_names(&ctx, rows).await)
}

async fn host_bookings(
    State(ctx): State<AppContext>,
    user: CurrentUser,
) -> Result<Json<Vec<BookingView>>, AppError> {
    user.require_host()?;
    let rows = ctx.store.bookings_for_host(user.profile_id).await;
    Ok(Json(venue_names(&ctx, rows).await))
}

/// Guests may cancel their own booking; the owning host or an admin may
/// apply any transition the lifecycle allows.
async fn authorize_transition(
    ctx: &AppContext,
    user: &CurrentUser,
    booking: &Booking,
    req: &UpdateStatusRequest,
) -> Result<(), AppError> {
    use venuehub_store::models::BookingStatus;

    if user.role.is_admin() {
        return Ok(());
    }
    if booking.guest_id == user.profile_id && req.status == BookingStatus::Cancelled {
        return Ok(());
    }
    let owns_venue = ctx
        .store
        .venue(booking.venue_id)
        .await
        .is_some_and(|v| v.host_id == user.profile_id);
    if owns_venue {
        return Ok(());
    }
    Err(AppError::forbidden(
        "only the guest (cancelling), the venue host, or an admin may change this booking",
    ))
}

async fn update_status(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = ctx
        .store
        .booking(id)
        .await
        .ok_or_else(|| AppError::not_found("booking not found"))?;

    authorize_transition(&ctx, &user, &booking, &req).await?;

    if !booking.status.can_transition_to(req.status) {
        return Err(AppError::conflict(format!(
            "cannot move a {} booking to {}",
            booking.status, req.status
        )));
    }

    let updated = ctx
        .store
        .modify_booking(id, |b| b.status = req.status)
        .await?;

    let venue_name = ctx
        .store
        .venue(updated.venue_id)
        .await
        .map(|v| v.name)
        .unwrap_or_default();
    ctx.events.publish(DomainEvent::BookingStatusChanged {
        booking_id: updated.id,
        venue_name,
        guest_id: updated.guest_id,
        status: updated.status,
    });

    tracing::info!(booking = %updated.id, status = %updated.status, "booking status changed");
    Ok(Json(updated))
}

/// Create a new instance of the bookings module.
pub fn create_module(ctx: AppContext) -> Arc<dyn Module> {
    Arc::new(BookingsModule::new(ctx))
}
