use serde::{Deserialize, Serialize};

use venuehub_store::models::Venue;
use venuehub_store::VenueFilter;

/// Search surface of the venue listing.
#[derive(Debug, Deserialize, Default)]
pub struct VenueQuery {
    pub city: Option<String>,
    pub category: Option<String>,
    pub min_capacity: Option<u32>,
    pub max_price: Option<f64>,
}

impl From<VenueQuery> for VenueFilter {
    fn from(query: VenueQuery) -> Self {
        VenueFilter {
            city: query.city,
            category: query.category,
            min_capacity: query.min_capacity,
            max_price: query.max_price,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateVenueRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub price_per_hour: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub rules: Option<String>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateVenueRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub capacity: Option<u32>,
    pub price_per_hour: Option<f64>,
    pub images: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
    pub rules: Option<String>,
    pub is_active: Option<bool>,
}

/// A venue row plus its display-only rating aggregate.
#[derive(Debug, Serialize)]
pub struct VenueResponse {
    #[serde(flatten)]
    pub venue: Venue,
    pub average_rating: f64,
    pub review_count: usize,
}
