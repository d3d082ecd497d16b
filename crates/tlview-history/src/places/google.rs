//! Google Places "details" endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{PlaceDetails, PlaceLookup, PlacesError};

const DETAILS_PATH: &str = "/maps/api/place/details/json";
const DETAILS_FIELDS: &str =
    "name,formatted_address,formatted_phone_number,rating,website,types,opening_hours,photos";

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<GooglePlace>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GooglePlace {
    name: Option<String>,
    formatted_address: Option<String>,
    formatted_phone_number: Option<String>,
    rating: Option<f64>,
    website: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    opening_hours: Option<OpeningHours>,
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct OpeningHours {
    #[serde(default)]
    weekday_text: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    photo_reference: String,
}

pub struct GooglePlacesClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GooglePlacesClient {
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl PlaceLookup for GooglePlacesClient {
    async fn lookup(&self, place_id: &str) -> Result<Option<PlaceDetails>, PlacesError> {
        let response = self
            .client
            .get(format!("{}{DETAILS_PATH}", self.base_url))
            .query(&[
                ("place_id", place_id),
                ("fields", DETAILS_FIELDS),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                place_id: place_id.to_owned(),
            });
        }

        let bytes = response.bytes().await?;
        let body: DetailsResponse =
            serde_json::from_slice(&bytes).map_err(|source| PlacesError::Deserialize {
                place_id: place_id.to_owned(),
                source,
            })?;

        match (body.status.as_str(), body.result) {
            ("OK", Some(place)) => Ok(Some(PlaceDetails {
                place_id: place_id.to_owned(),
                name: place.name,
                formatted_address: place.formatted_address,
                formatted_phone_number: place.formatted_phone_number,
                rating: place.rating,
                website: place.website,
                types: place.types,
                opening_hours: place
                    .opening_hours
                    .map(|hours| hours.weekday_text)
                    .unwrap_or_default(),
                photo_references: place
                    .photos
                    .into_iter()
                    .map(|photo| photo.photo_reference)
                    .collect(),
            })),
            ("OK" | "NOT_FOUND" | "ZERO_RESULTS" | "INVALID_REQUEST", _) => Ok(None),
            (other, _) => Err(PlacesError::Status {
                status: other.to_owned(),
                place_id: place_id.to_owned(),
                message: body.error_message.unwrap_or_default(),
            }),
        }
    }
}
