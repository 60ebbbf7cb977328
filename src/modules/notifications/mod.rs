//! In-app notifications, written by a background consumer of the domain
//! event bus. A new booking notifies the host; every status change
//! notifies the guest. Reads are capped at the most recent rows.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use venuehub_events::DomainEvent;
use venuehub_http::error::AppError;
use venuehub_http::extract::CurrentUser;
use venuehub_kernel::{AppContext, Module};
use venuehub_store::models::{BookingStatus, NewNotification, Notification, NotificationKind};
use venuehub_store::Store;

/// Most recent rows returned per feed request.
const FEED_LIMIT: usize = 50;

pub struct NotificationsModule {
    ctx: AppContext,
    consumer: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationsModule {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            consumer: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Module for NotificationsModule {
    fn name(&self) -> &'static str {
        "notifications"
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_notifications))
            .route("/{id}/read", post(mark_read))
            .route("/read-all", post(mark_all_read))
            .with_state(self.ctx.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "The caller's notification feed, newest first",
                        "tags": ["Notifications"],
                        "responses": { "200": { "description": "Feed with unread count" } }
                    }
                },
                "/{id}/read": {
                    "post": {
                        "summary": "Mark one notification as read",
                        "tags": ["Notifications"],
                        "responses": {
                            "200": { "description": "Updated notification" },
                            "404": { "description": "Not the caller's notification" }
                        }
                    }
                },
                "/read-all": {
                    "post": {
                        "summary": "Mark every unread notification as read",
                        "tags": ["Notifications"],
                        "responses": { "200": { "description": "Count of rows changed" } }
                    }
                }
            }
        }))
    }

    async fn start(&self, ctx: &AppContext) -> anyhow::Result<()> {
        let mut rx = ctx.events.subscribe();
        let store = ctx.store.clone();
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => record_event(&store, event).await,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "notification consumer lagged behind event bus");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        *self.consumer.lock().await = Some(handle);
        tracing::info!(module = self.name(), "notification consumer started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        if let Some(handle) = self.consumer.lock().await.take() {
            handle.abort();
        }
        Ok(())
    }
}

/// Translate a domain event into the notification rows it implies.
async fn record_event(store: &Store, event: DomainEvent) {
    match event {
        DomainEvent::BookingCreated {
            booking_id,
            venue_name,
            host_id,
            ..
        } => {
            store
                .create_notification(NewNotification {
                    user_id: host_id,
                    title: "New booking request".to_string(),
                    message: format!("You have a new booking request for {venue_name}"),
                    kind: NotificationKind::Info,
                    related_booking_id: Some(booking_id),
                })
                .await;
        }
        DomainEvent::BookingStatusChanged {
            booking_id,
            venue_name,
            guest_id,
            status,
        } => {
            let (title, message, kind) = match status {
                BookingStatus::Confirmed => (
                    "Booking confirmed",
                    format!("Your booking at {venue_name} has been confirmed"),
                    NotificationKind::Success,
                ),
                BookingStatus::Cancelled => (
                    "Booking cancelled",
                    format!("Your booking at {venue_name} has been cancelled"),
                    NotificationKind::Warning,
                ),
                BookingStatus::Completed => (
                    "Booking completed",
                    format!("Your booking at {venue_name} is complete"),
                    NotificationKind::Info,
                ),
                // Bookings are created pending; no change lands here.
                BookingStatus::Pending => return,
            };
            store
                .create_notification(NewNotification {
                    user_id: guest_id,
                    title: title.to_string(),
                    message,
                    kind,
                    related_booking_id: Some(booking_id),
                })
                .await;
        }
    }
}

#[derive(Debug, Serialize)]
struct FeedResponse {
    notifications: Vec<Notification>,
    unread_count: usize,
}

#[derive(Debug, Serialize)]
struct ReadAllResponse {
    marked_read: usize,
}

async fn list_notifications(
    State(ctx): State<AppContext>,
    user: CurrentUser,
) -> Json<FeedResponse> {
    let notifications = ctx.store.notifications_for(user.profile_id, FEED_LIMIT).await;
    let unread_count = ctx.store.count_unread(user.profile_id).await;
    Json(FeedResponse {
        notifications,
        unread_count,
    })
}

async fn mark_read(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, AppError> {
    let updated = ctx.store.mark_notification_read(id, user.profile_id).await?;
    Ok(Json(updated))
}

async fn mark_all_read(
    State(ctx): State<AppContext>,
    user: CurrentUser,
) -> Json<ReadAllResponse> {
    let marked_read = ctx.store.mark_all_read(user.profile_id).await;
    Json(ReadAllResponse { marked_read })
}

/// Create a new instance of the notifications module.
pub fn create_module(ctx: AppContext) -> Arc<dyn Module> {
    Arc::new(NotificationsModule::new(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_for(profile_id: Uuid) -> CurrentUser {
        CurrentUser {
            profile_id,
            role: venuehub_store::models::Role::Guest,
            token: String::new(),
        }
    }

    #[tokio::test]
    async fn booking_created_notifies_the_host() {
        let ctx = AppContext::default();
        let host_id = Uuid::now_v7();

        record_event(
            &ctx.store,
            DomainEvent::BookingCreated {
                booking_id: Uuid::now_v7(),
                venue_id: Uuid::now_v7(),
                venue_name: "Cellar".to_string(),
                host_id,
                guest_id: Uuid::now_v7(),
            },
        )
        .await;

        let feed = list_notifications(State(ctx), user_for(host_id)).await;
        assert_eq!(feed.0.unread_count, 1);
        assert_eq!(feed.0.notifications[0].title, "New booking request");
        assert_eq!(feed.0.notifications[0].kind, NotificationKind::Info);
    }

    #[tokio::test]
    async fn status_changes_notify_the_guest_with_matching_kinds() {
        let ctx = AppContext::default();
        let guest_id = Uuid::now_v7();

        for status in [
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            record_event(
                &ctx.store,
                DomainEvent::BookingStatusChanged {
                    booking_id: Uuid::now_v7(),
                    venue_name: "Cellar".to_string(),
                    guest_id,
                    status,
                },
            )
            .await;
        }

        let feed = list_notifications(State(ctx), user_for(guest_id)).await;
        assert_eq!(feed.0.unread_count, 3);
        let kinds: Vec<NotificationKind> =
            feed.0.notifications.iter().map(|n| n.kind).collect();
        for kind in [
            NotificationKind::Success,
            NotificationKind::Warning,
            NotificationKind::Info,
        ] {
            assert!(kinds.contains(&kind), "missing {kind:?}");
        }
    }

    #[tokio::test]
    async fn reading_is_scoped_to_the_owner() {
        let ctx = AppContext::default();
        let owner = Uuid::now_v7();
        let notification = ctx
            .store
            .create_notification(NewNotification {
                user_id: owner,
                title: "Booking confirmed".to_string(),
                message: "Your booking at Cellar has been confirmed".to_string(),
                kind: NotificationKind::Success,
                related_booking_id: None,
            })
            .await;

        let stranger = mark_read(
            State(ctx.clone()),
            user_for(Uuid::now_v7()),
            Path(notification.id),
        )
        .await;
        assert!(stranger.is_err());

        let read = mark_read(State(ctx.clone()), user_for(owner), Path(notification.id))
            .await
            .unwrap();
        assert!(read.0.is_read);
        assert_eq!(ctx.store.count_unread(owner).await, 0);
    }

    #[tokio::test]
    async fn started_module_consumes_published_events() {
        let ctx = AppContext::default();
        let module = NotificationsModule::new(ctx.clone());
        module.start(&ctx).await.unwrap();

        let host_id = Uuid::now_v7();
        ctx.events.publish(DomainEvent::BookingCreated {
            booking_id: Uuid::now_v7(),
            venue_id: Uuid::now_v7(),
            venue_name: "Cellar".to_string(),
            host_id,
            guest_id: Uuid::now_v7(),
        });

        // The consumer runs on its own task; poll briefly for the write.
        let mut written = false;
        for _ in 0..50 {
            if ctx.store.count_unread(host_id).await == 1 {
                written = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        module.stop().await.unwrap();
        assert!(written);
    }
}
