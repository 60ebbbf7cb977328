use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Booking, NewBooking, NewNotification, NewProfile, NewVenue, Notification, Profile, Review,
    Role, Venue,
};

/// Failures surfaced by the table store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("a profile with this email already exists")]
    DuplicateEmail,
    #[error("the venue is already booked for an overlapping time window")]
    OverlappingBooking,
}

/// Filter predicate for the venue listing, matching the search surface of
/// the marketplace: city substring, exact category, capacity floor, price
/// ceiling. Absent fields match everything.
#[derive(Debug, Clone, Default)]
pub struct VenueFilter {
    pub city: Option<String>,
    pub category: Option<String>,
    pub min_capacity: Option<u32>,
    pub max_price: Option<f64>,
}

impl VenueFilter {
    fn matches(&self, venue: &Venue) -> bool {
        if let Some(city) = &self.city {
            if !venue.city.to_lowercase().contains(&city.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if venue.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        if let Some(min) = self.min_capacity {
            if venue.capacity < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if venue.price_per_hour > max {
                return false;
            }
        }
        true
    }
}

/// In-memory relational tables standing in for the hosted backend. Each
/// table sits behind its own async `RwLock`; the bookings table is the only
/// one where a read-then-write sequence must hold the write lock across
/// both steps (overlap check + insert).
#[derive(Default)]
pub struct Store {
    profiles: RwLock<HashMap<Uuid, Profile>>,
    venues: RwLock<HashMap<Uuid, Venue>>,
    bookings: RwLock<HashMap<Uuid, Booking>>,
    favorites: RwLock<HashSet<(Uuid, Uuid)>>,
    reviews: RwLock<Vec<Review>>,
    notifications: RwLock<HashMap<Uuid, Notification>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- profiles ----

    pub async fn create_profile(&self, new: NewProfile) -> Result<Profile, StoreError> {
        let mut table = self.profiles.write().await;
        let email = new.email.to_lowercase();
        if table.values().any(|p| p.email == email) {
            return Err(StoreError::DuplicateEmail);
        }
        let now = Utc::now();
        let profile = Profile {
            id: Uuid::now_v7(),
            email,
            full_name: new.full_name,
            phone: new.phone,
            avatar_url: None,
            role: new.role,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        table.insert(profile.id, profile.clone());
        Ok(profile)
    }

    pub async fn profile(&self, id: Uuid) -> Option<Profile> {
        self.profiles.read().await.get(&id).cloned()
    }

    pub async fn profile_by_email(&self, email: &str) -> Option<Profile> {
        let email = email.to_lowercase();
        self.profiles
            .read()
            .await
            .values()
            .find(|p| p.email == email)
            .cloned()
    }

    pub async fn count_profiles(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn count_profiles_with_role(&self, role: Role) -> usize {
        self.profiles
            .read()
            .await
            .values()
            .filter(|p| p.role == role)
            .count()
    }

    // ---- venues ----

    pub async fn create_venue(&self, new: NewVenue) -> Venue {
        let now = Utc::now();
        let venue = Venue {
            id: Uuid::now_v7(),
            host_id: new.host_id,
            name: new.name,
            description: new.description,
            category: new.category,
            address: new.address,
            city: new.city,
            postal_code: new.postal_code,
            latitude: new.latitude,
            longitude: new.longitude,
            capacity: new.capacity,
            price_per_hour: new.price_per_hour,
            images: new.images,
            amenities: new.amenities,
            rules: new.rules,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.venues.write().await.insert(venue.id, venue.clone());
        venue
    }

    pub async fn venue(&self, id: Uuid) -> Option<Venue> {
        self.venues.read().await.get(&id).cloned()
    }

    /// Apply an in-place mutation to a venue row, bumping `updated_at`.
    pub async fn modify_venue<F>(&self, id: Uuid, apply: F) -> Result<Venue, StoreError>
    where
        F: FnOnce(&mut Venue),
    {
        let mut table = self.venues.write().await;
        let venue = table.get_mut(&id).ok_or(StoreError::NotFound("venue"))?;
        apply(venue);
        venue.updated_at = Utc::now();
        Ok(venue.clone())
    }

    /// Active venues matching the filter, newest first.
    pub async fn venues_filtered(&self, filter: &VenueFilter) -> Vec<Venue> {
        let mut rows: Vec<Venue> = self
            .venues
            .read()
            .await
            .values()
            .filter(|v| v.is_active && filter.matches(v))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    pub async fn venues_by_host(&self, host_id: Uuid) -> Vec<Venue> {
        let mut rows: Vec<Venue> = self
            .venues
            .read()
            .await
            .values()
            .filter(|v| v.host_id == host_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    pub async fn count_venues(&self) -> usize {
        self.venues.read().await.len()
    }

    pub async fn count_active_venues(&self) -> usize {
        self.venues
            .read()
            .await
            .values()
            .filter(|v| v.is_active)
            .count()
    }

    // ---- bookings ----

    /// Insert a booking, rejecting it when a pending or confirmed booking
    /// for the same venue intersects the requested window. The check and the
    /// insert happen under one write guard so racing submissions serialize.
    pub async fn create_booking(&self, new: NewBooking) -> Result<Booking, StoreError> {
        let mut table = self.bookings.write().await;
        let overlaps = table.values().any(|b| {
            b.venue_id == new.venue_id
                && b.status.blocks_slot()
                && b.start_datetime < new.end_datetime
                && new.start_datetime < b.end_datetime
        });
        if overlaps {
            return Err(StoreError::OverlappingBooking);
        }
        let now = Utc::now();
        let booking = Booking {
            id: Uuid::now_v7(),
            venue_id: new.venue_id,
            guest_id: new.guest_id,
            start_datetime: new.start_datetime,
            end_datetime: new.end_datetime,
            guest_count: new.guest_count,
            total_price: new.total_price,
            status: crate::models::BookingStatus::Pending,
            special_requests: new.special_requests,
            created_at: now,
            updated_at: now,
        };
        table.insert(booking.id, booking.clone());
        Ok(booking)
    }

    pub async fn booking(&self, id: Uuid) -> Option<Booking> {
        self.bookings.read().await.get(&id).cloned()
    }

    pub async fn modify_booking<F>(&self, id: Uuid, apply: F) -> Result<Booking, StoreError>
    where
        F: FnOnce(&mut Booking),
    {
        let mut table = self.bookings.write().await;
        let booking = table.get_mut(&id).ok_or(StoreError::NotFound("booking"))?;
        apply(booking);
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    /// A guest's own bookings, most recent start first.
    pub async fn bookings_by_guest(&self, guest_id: Uuid) -> Vec<Booking> {
        let mut rows: Vec<Booking> = self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.guest_id == guest_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.start_datetime.cmp(&a.start_datetime));
        rows
    }

    /// Bookings across every venue the host owns, newest created first.
    pub async fn bookings_for_host(&self, host_id: Uuid) -> Vec<Booking> {
        let venue_ids: HashSet<Uuid> = self
            .venues
            .read()
            .await
            .values()
            .filter(|v| v.host_id == host_id)
            .map(|v| v.id)
            .collect();
        let mut rows: Vec<Booking> = self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| venue_ids.contains(&b.venue_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    pub async fn all_bookings(&self) -> Vec<Booking> {
        self.bookings.read().await.values().cloned().collect()
    }

    // ---- favorites ----

    /// Idempotent insert; returns whether the pair was newly added.
    pub async fn add_favorite(&self, user_id: Uuid, venue_id: Uuid) -> bool {
        self.favorites.write().await.insert((user_id, venue_id))
    }

    /// Idempotent delete; returns whether the pair existed.
    pub async fn remove_favorite(&self, user_id: Uuid, venue_id: Uuid) -> bool {
        self.favorites.write().await.remove(&(user_id, venue_id))
    }

    pub async fn is_favorite(&self, user_id: Uuid, venue_id: Uuid) -> bool {
        self.favorites.read().await.contains(&(user_id, venue_id))
    }

    pub async fn favorites_of(&self, user_id: Uuid) -> Vec<Uuid> {
        self.favorites
            .read()
            .await
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, v)| *v)
            .collect()
    }

    // ---- reviews ----

    pub async fn add_review(&self, venue_id: Uuid, rating: u8) -> Review {
        let review = Review {
            id: Uuid::now_v7(),
            venue_id,
            rating,
        };
        self.reviews.write().await.push(review.clone());
        review
    }

    /// (average rating, review count) for one venue; (0.0, 0) when unreviewed.
    pub async fn rating_summary(&self, venue_id: Uuid) -> (f64, usize) {
        let table = self.reviews.read().await;
        let ratings: Vec<u8> = table
            .iter()
            .filter(|r| r.venue_id == venue_id)
            .map(|r| r.rating)
            .collect();
        if ratings.is_empty() {
            return (0.0, 0);
        }
        let sum: u32 = ratings.iter().map(|r| u32::from(*r)).sum();
        (f64::from(sum) / ratings.len() as f64, ratings.len())
    }

    // ---- notifications ----

    pub async fn create_notification(&self, new: NewNotification) -> Notification {
        let notification = Notification {
            id: Uuid::now_v7(),
            user_id: new.user_id,
            title: new.title,
            message: new.message,
            kind: new.kind,
            related_booking_id: new.related_booking_id,
            is_read: false,
            created_at: Utc::now(),
        };
        self.notifications
            .write()
            .await
            .insert(notification.id, notification.clone());
        notification
    }

    /// Newest notifications for a user, capped at `limit`.
    pub async fn notifications_for(&self, user_id: Uuid, limit: usize) -> Vec<Notification> {
        let mut rows: Vec<Notification> = self
            .notifications
            .read()
            .await
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        rows
    }

    pub async fn count_unread(&self, user_id: Uuid) -> usize {
        self.notifications
            .read()
            .await
            .values()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count()
    }

    /// Mark one of the user's notifications read.
    pub async fn mark_notification_read(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Notification, StoreError> {
        let mut table = self.notifications.write().await;
        let row = table
            .get_mut(&id)
            .filter(|n| n.user_id == user_id)
            .ok_or(StoreError::NotFound("notification"))?;
        row.is_read = true;
        Ok(row.clone())
    }

    /// Mark everything unread for a user read; returns how many changed.
    pub async fn mark_all_read(&self, user_id: Uuid) -> usize {
        let mut table = self.notifications.write().await;
        let mut changed = 0;
        for row in table.values_mut() {
            if row.user_id == user_id && !row.is_read {
                row.is_read = true;
                changed += 1;
            }
        }
        changed
    }
}

/// Timestamp helper shared by dashboard aggregation and tests.
pub fn same_calendar_month(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    use chrono::Datelike;
    a.year() == b.year() && a.month() == b.month()
}
