//! Place-details lookups for visits that carry a place id.
//!
//! The record collection only stores the id; details are fetched on demand
//! through a [`PlaceLookup`] and memoized by [`PlaceDetailsCache`].

mod cache;
mod google;

pub use cache::PlaceDetailsCache;
pub use google::GooglePlacesClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured details for one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub rating: Option<f64>,
    pub website: Option<String>,
    pub types: Vec<String>,
    /// One line per weekday, as published by the provider.
    pub opening_hours: Vec<String>,
    pub photo_references: Vec<String>,
}

impl PlaceDetails {
    /// Category tags for display (`"grocery_or_supermarket"` → `"grocery or supermarket"`).
    #[must_use]
    pub fn type_labels(&self) -> Vec<String> {
        self.types.iter().map(|tag| place_type_label(tag)).collect()
    }
}

#[must_use]
pub fn place_type_label(tag: &str) -> String {
    tag.replace('_', " ")
}

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for place {place_id}: {source}")]
    Deserialize {
        place_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} looking up place {place_id}")]
    UnexpectedStatus { status: u16, place_id: String },

    #[error("places API returned {status} for place {place_id}: {message}")]
    Status {
        status: String,
        place_id: String,
        message: String,
    },
}

/// A source of place details.
///
/// `Ok(None)` means the provider does not know the place.
#[async_trait]
pub trait PlaceLookup: Send + Sync {
    async fn lookup(&self, place_id: &str) -> Result<Option<PlaceDetails>, PlacesError>;
}
