//! Top-level document shape detection and dispatch.

use serde_json::Value;
use tlview_core::LocationRecord;

use crate::error::HistoryError;
use crate::path::expand_path;
use crate::segment::normalize_segment;

/// The recognised top-level shape of an export document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DocumentShape<'a> {
    /// A bare array of raw segments.
    Segments(&'a [Value]),
    /// An object carrying `semanticSegments`, `rawSignals`, or both.
    Sections {
        semantic_segments: Option<&'a [Value]>,
        raw_signals: Option<&'a [Value]>,
    },
    Unrecognized,
}

#[must_use]
pub fn detect_shape(document: &Value) -> DocumentShape<'_> {
    if let Some(segments) = document.as_array() {
        return DocumentShape::Segments(segments);
    }
    let semantic_segments = document
        .get("semanticSegments")
        .and_then(Value::as_array)
        .map(Vec::as_slice);
    let raw_signals = document
        .get("rawSignals")
        .and_then(Value::as_array)
        .map(Vec::as_slice);
    if semantic_segments.is_none() && raw_signals.is_none() {
        return DocumentShape::Unrecognized;
    }
    DocumentShape::Sections {
        semantic_segments,
        raw_signals,
    }
}

/// Normalize a whole export document into one ordered record collection.
///
/// Segment-derived records keep document order and come before any records
/// derived from `rawSignals`. An unrecognized document yields no records.
#[must_use]
pub fn load_history(document: &Value) -> Vec<LocationRecord> {
    let records: Vec<LocationRecord> = match detect_shape(document) {
        DocumentShape::Segments(segments) => {
            segments.iter().flat_map(normalize_segment).collect()
        }
        DocumentShape::Sections {
            semantic_segments,
            raw_signals,
        } => {
            let mut records: Vec<LocationRecord> = semantic_segments
                .unwrap_or_default()
                .iter()
                .flat_map(normalize_segment)
                .collect();
            if let Some(signals) = raw_signals {
                records.extend(expand_path(signals, None));
            }
            records
        }
        DocumentShape::Unrecognized => {
            tracing::warn!("history document has no recognised top-level shape");
            Vec::new()
        }
    };
    tracing::debug!(count = records.len(), "normalized history document");
    records
}

/// Decode raw JSON bytes and normalize them.
///
/// # Errors
///
/// Returns [`HistoryError::Deserialize`] if `bytes` is not valid JSON.
pub fn decode_history(bytes: &[u8], context: &str) -> Result<Vec<LocationRecord>, HistoryError> {
    let document: Value =
        serde_json::from_slice(bytes).map_err(|source| HistoryError::Deserialize {
            context: context.to_string(),
            source,
        })?;
    Ok(load_history(&document))
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
