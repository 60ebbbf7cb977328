//! Per-user venue favorites. Stored server-side against the profile so the
//! set follows the account across devices; add and remove are idempotent.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use venuehub_http::error::AppError;
use venuehub_http::extract::CurrentUser;
use venuehub_kernel::{AppContext, Module};
use venuehub_store::models::Venue;

pub struct FavoritesModule {
    ctx: AppContext,
}

impl FavoritesModule {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Module for FavoritesModule {
    fn name(&self) -> &'static str {
        "favorites"
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_favorites))
            .route(
                "/{venue_id}",
                get(favorite_status)
                    .put(add_favorite)
                    .delete(remove_favorite),
            )
            .with_state(self.ctx.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "The caller's favorited venues",
                        "tags": ["Favorites"],
                        "responses": { "200": { "description": "Venues" } }
                    }
                },
                "/{venue_id}": {
                    "get": {
                        "summary": "Whether the caller has favorited this venue",
                        "tags": ["Favorites"],
                        "responses": { "200": { "description": "Favorite flag" } }
                    },
                    "put": {
                        "summary": "Favorite a venue (idempotent)",
                        "tags": ["Favorites"],
                        "responses": {
                            "204": { "description": "Favorited" },
                            "404": { "description": "Unknown venue" }
                        }
                    },
                    "delete": {
                        "summary": "Unfavorite a venue (idempotent)",
                        "tags": ["Favorites"],
                        "responses": { "204": { "description": "No longer favorited" } }
                    }
                }
            }
        }))
    }
}

#[derive(Debug, Serialize)]
struct FavoriteStatus {
    venue_id: Uuid,
    is_favorite: bool,
}

async fn list_favorites(
    State(ctx): State<AppContext>,
    user: CurrentUser,
) -> Json<Vec<Venue>> {
    let ids = ctx.store.favorites_of(user.profile_id).await;
    let mut venues = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(venue) = ctx.store.venue(id).await {
            venues.push(venue);
        }
    }
    // Stable display order regardless of set iteration.
    venues.sort_by(|a, b| a.name.cmp(&b.name));
    Json(venues)
}

async fn favorite_status(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(venue_id): Path<Uuid>,
) -> Json<FavoriteStatus> {
    let is_favorite = ctx.store.is_favorite(user.profile_id, venue_id).await;
    Json(FavoriteStatus {
        venue_id,
        is_favorite,
    })
}

async fn add_favorite(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(venue_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if ctx.store.venue(venue_id).await.is_none() {
        return Err(AppError::not_found("venue not found"));
    }
    ctx.store.add_favorite(user.profile_id, venue_id).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_favorite(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(venue_id): Path<Uuid>,
) -> StatusCode {
    ctx.store.remove_favorite(user.profile_id, venue_id).await;
    StatusCode::NO_CONTENT
}

/// Create a new instance of the favorites module.
pub fn create_module(ctx: AppContext) -> Arc<dyn Module> {
    Arc::new(FavoritesModule::new(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use venuehub_store::models::{NewVenue, Role};

    fn user() -> CurrentUser {
        CurrentUser {
            profile_id: Uuid::now_v7(),
            role: Role::Guest,
            token: String::new(),
        }
    }

    async fn seed_venue(ctx: &AppContext, name: &str) -> Venue {
        ctx.store
            .create_venue(NewVenue {
                host_id: Uuid::now_v7(),
                name: name.to_string(),
                description: None,
                category: None,
                address: "Hviezdoslavovo 1".to_string(),
                city: "Bratislava".to_string(),
                postal_code: None,
                latitude: None,
                longitude: None,
                capacity: 10,
                price_per_hour: 25.0,
                images: vec![],
                amenities: vec![],
                rules: None,
            })
            .await
    }

    #[tokio::test]
    async fn double_add_and_double_remove_are_idempotent() {
        let ctx = AppContext::default();
        let venue = seed_venue(&ctx, "Attic").await;
        let caller = user();

        for _ in 0..2 {
            let status = add_favorite(State(ctx.clone()), caller.clone(), Path(venue.id))
                .await
                .unwrap();
            assert_eq!(status, StatusCode::NO_CONTENT);
        }
        let listed = list_favorites(State(ctx.clone()), caller.clone()).await;
        assert_eq!(listed.0.len(), 1);

        for _ in 0..2 {
            let status = remove_favorite(State(ctx.clone()), caller.clone(), Path(venue.id)).await;
            assert_eq!(status, StatusCode::NO_CONTENT);
        }
        let listed = list_favorites(State(ctx), caller).await;
        assert!(listed.0.is_empty());
    }

    #[tokio::test]
    async fn unknown_venue_cannot_be_favorited() {
        let ctx = AppContext::default();
        let result = add_favorite(State(ctx), user(), Path(Uuid::now_v7())).await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn favorites_are_scoped_to_the_caller() {
        let ctx = AppContext::default();
        let venue = seed_venue(&ctx, "Barn").await;
        let alice = user();
        let bob = user();

        add_favorite(State(ctx.clone()), alice.clone(), Path(venue.id))
            .await
            .unwrap();

        let alice_view = favorite_status(State(ctx.clone()), alice, Path(venue.id)).await;
        assert!(alice_view.0.is_favorite);

        let bob_view = favorite_status(State(ctx), bob, Path(venue.id)).await;
        assert!(!bob_view.0.is_favorite);
    }
}
