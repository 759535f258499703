#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the dog adoption search API.
//!
//! These types are re-used by the browser front end and the CLI for
//! request/response encoding so both speak the exact wire shape of the remote
//! service. Field names follow the service (`zip_code`, `resultIds`, ...), not
//! Rust conventions, hence the serde renames.

use serde::{Deserialize, Serialize};

pub mod filters;

pub use filters::{
    DEFAULT_PAGE_SIZE, SearchFilters, SortDirection, SortField, SortParseError, SortSpec,
};

/// Credentials submitted to `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Display name of the user.
    pub name: String,
    /// Email address of the user.
    pub email: String,
}

/// Adoptable dog as returned by `POST /dogs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dog {
    /// Unique identifier assigned by the service.
    pub id: String,
    /// Photo URL.
    pub img: String,
    /// Dog name.
    pub name: String,
    /// Age in whole years; `0` means under one year.
    pub age: u32,
    /// Zip code where the dog is located.
    pub zip_code: String,
    /// Breed name as listed by `GET /dogs/breeds`.
    pub breed: String,
}

impl Dog {
    /// Age rendered for badges, with puppies shown as `< 1`.
    #[must_use]
    pub fn age_label(&self) -> String {
        if self.age == 0 {
            "< 1".to_string()
        } else {
            self.age.to_string()
        }
    }
}

/// Response of `GET /dogs/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Ordered ids for the requested page.
    #[serde(rename = "resultIds")]
    pub result_ids: Vec<String>,
    /// Total number of dogs matching the query.
    pub total: u64,
    /// Query string for the next page, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Query string for the previous page, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// Response of `POST /dogs/match`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResponse {
    /// Id of the dog chosen from the submitted candidates.
    #[serde(rename = "match")]
    pub matched: String,
}

/// Latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

/// Location record returned by the `/locations` endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Five digit zip code.
    pub zip_code: String,
    /// Latitude of the zip code centroid.
    pub latitude: f64,
    /// Longitude of the zip code centroid.
    pub longitude: f64,
    /// City name.
    pub city: String,
    /// Two letter state abbreviation.
    pub state: String,
    /// County name.
    pub county: String,
}

/// Bounding box accepted by `POST /locations/search`.
///
/// The service accepts either the four edges or a pair of opposite corners;
/// unset members are omitted from the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoBoundingBox {
    /// Top edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<Coordinates>,
    /// Left edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Coordinates>,
    /// Bottom edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Coordinates>,
    /// Right edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Coordinates>,
    /// Bottom-left corner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_left: Option<Coordinates>,
    /// Top-right corner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_right: Option<Coordinates>,
    /// Bottom-right corner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_right: Option<Coordinates>,
    /// Top-left corner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_left: Option<Coordinates>,
}

/// Body of `POST /locations/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationSearchRequest {
    /// City name filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Two letter state abbreviations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<String>>,
    /// Geographic bounding box.
    #[serde(
        rename = "geoBoundingBox",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub geo_bounding_box: Option<GeoBoundingBox>,
    /// Page size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// Page offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<u32>,
}

/// Response of `POST /locations/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSearchResponse {
    /// Locations on the requested page.
    pub results: Vec<Location>,
    /// Total number of matching locations.
    pub total: u64,
}
