//! Location-history loading and normalization.
//!
//! Turns any of the known export shapes (flat segment array,
//! `semanticSegments`, `rawSignals`) into one ordered collection of
//! [`LocationRecord`]s, and provides the day-view, map and playback helpers
//! that consume that collection.

pub mod client;
pub mod coords;
pub mod day;
pub mod display;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod path;
pub mod places;
pub mod playback;
mod rate_limit;
pub mod segment;
pub mod source;
pub mod store;
mod timestamp;

pub use client::HistoryClient;
pub use coords::parse_coordinates;
pub use day::{available_days, parse_day, records_for_day, shift_day, DaySummary};
pub use display::{build_timeline_rows, format_duration, format_time, TimelineRow};
pub use error::HistoryError;
pub use geometry::{day_bounds, map_features, Bounds, MapFeature};
pub use loader::{decode_history, load_history};
pub use path::expand_path;
pub use places::{
    place_type_label, GooglePlacesClient, PlaceDetails, PlaceDetailsCache, PlaceLookup, PlacesError,
};
pub use playback::{Playback, PlaybackFrame, PLAYBACK_STEP};
pub use segment::normalize_segment;
pub use source::HistorySource;
pub use store::{HistoryStore, LoadTicket, ReloadOutcome};

pub use tlview_core::{LatLng, LocationRecord};
