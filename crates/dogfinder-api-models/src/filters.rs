//! Search filter parameters and their query-string encoding.
//!
//! # Design
//! - `SearchFilters` is persisted verbatim, so its serde shape is the storage
//!   format as well as a mirror of the `/dogs/search` query.
//! - Sort is a typed `field:direction` pair that still encodes as the plain
//!   string the service expects.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when none was configured.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Field the search results are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortField {
    /// Order by breed name.
    #[default]
    Breed,
    /// Order by dog name.
    Name,
    /// Order by age.
    Age,
}

impl SortField {
    /// Every sortable field in menu order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Breed, Self::Name, Self::Age]
    }

    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breed => "breed",
            Self::Name => "name",
            Self::Age => "age",
        }
    }

    /// Human-facing label for sort menus.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Breed => "Breed",
            Self::Name => "Name",
            Self::Age => "Age",
        }
    }
}

impl FromStr for SortField {
    type Err = SortParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "breed" => Ok(Self::Breed),
            "name" => Ok(Self::Name),
            "age" => Ok(Self::Age),
            _ => Err(SortParseError {
                value: value.to_string(),
            }),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Wire name of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = SortParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(SortParseError {
                value: value.to_string(),
            }),
        }
    }
}

/// Failure to parse a `field:direction` sort value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid sort '{value}': expected <breed|name|age>:<asc|desc>")]
pub struct SortParseError {
    /// The rejected input.
    pub value: String,
}

/// Sort specification, encoded as `field:direction` (e.g. `breed:asc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SortSpec {
    /// Field to order by.
    pub field: SortField,
    /// Order direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Build a sort specification.
    #[must_use]
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Same field, opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        Self {
            field: self.field,
            direction: self.direction.flipped(),
        }
    }

    /// Different field, same direction.
    #[must_use]
    pub const fn with_field(self, field: SortField) -> Self {
        Self {
            field,
            direction: self.direction,
        }
    }
}

impl Display for SortSpec {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}:{}",
            self.field.as_str(),
            self.direction.as_str()
        )
    }
}

impl FromStr for SortSpec {
    type Err = SortParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (field, direction) = value.split_once(':').ok_or_else(|| SortParseError {
            value: value.to_string(),
        })?;
        Ok(Self {
            field: field.parse()?,
            direction: direction.parse()?,
        })
    }
}

impl TryFrom<String> for SortSpec {
    type Error = SortParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortSpec> for String {
    fn from(value: SortSpec) -> Self {
        value.to_string()
    }
}

/// Filter, sort and pagination parameters for `GET /dogs/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Breeds to include; empty means every breed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breeds: Vec<String>,
    /// Inclusive lower age bound.
    #[serde(rename = "ageMin", default, skip_serializing_if = "Option::is_none")]
    pub age_min: Option<u32>,
    /// Inclusive upper age bound.
    #[serde(rename = "ageMax", default, skip_serializing_if = "Option::is_none")]
    pub age_max: Option<u32>,
    /// Zip codes to include.
    #[serde(rename = "zipCodes", default, skip_serializing_if = "Option::is_none")]
    pub zip_codes: Option<Vec<String>>,
    /// Result ordering.
    #[serde(default)]
    pub sort: SortSpec,
    /// Zero-based result offset.
    #[serde(default)]
    pub from: u32,
    /// Page size.
    #[serde(default = "default_page_size")]
    pub size: u32,
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            breeds: Vec::new(),
            age_min: None,
            age_max: None,
            zip_codes: None,
            sort: SortSpec::default(),
            from: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchFilters {
    /// Page size, never zero.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        if self.size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.size
        }
    }

    /// Whether any breed, age or zip filter is active.
    #[must_use]
    pub fn has_filters(&self) -> bool {
        !self.breeds.is_empty()
            || self.age_min.is_some()
            || self.age_max.is_some()
            || self.zip_codes.as_ref().is_some_and(|zips| !zips.is_empty())
    }

    /// Query parameters in the order the service documents them.
    ///
    /// List parameters repeat their key once per value.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        for breed in &self.breeds {
            pairs.push(("breeds", breed.clone()));
        }
        if let Some(zip_codes) = &self.zip_codes {
            for zip in zip_codes {
                pairs.push(("zipCodes", zip.clone()));
            }
        }
        if let Some(age_min) = self.age_min {
            pairs.push(("ageMin", age_min.to_string()));
        }
        if let Some(age_max) = self.age_max {
            pairs.push(("ageMax", age_max.to_string()));
        }
        pairs.push(("size", self.page_size().to_string()));
        pairs.push(("from", self.from.to_string()));
        pairs.push(("sort", self.sort.to_string()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_round_trips_through_text() {
        let spec: SortSpec = "age:desc".parse().unwrap();
        assert_eq!(spec, SortSpec::new(SortField::Age, SortDirection::Desc));
        assert_eq!(spec.to_string(), "age:desc");
        assert_eq!(SortSpec::default().to_string(), "breed:asc");
    }

    #[test]
    fn sort_rejects_unknown_parts() {
        assert!("color:asc".parse::<SortSpec>().is_err());
        assert!("name:up".parse::<SortSpec>().is_err());
        assert!("name".parse::<SortSpec>().is_err());
    }

    #[test]
    fn sort_errors_name_the_rejected_input() {
        let err: Box<dyn std::error::Error> = Box::new("name".parse::<SortSpec>().unwrap_err());
        assert_eq!(
            err.to_string(),
            "invalid sort 'name': expected <breed|name|age>:<asc|desc>"
        );
    }

    #[test]
    fn toggle_and_field_change_preserve_the_other_half() {
        let spec = SortSpec::new(SortField::Name, SortDirection::Desc);
        assert_eq!(spec.toggled().direction, SortDirection::Asc);
        assert_eq!(spec.toggled().field, SortField::Name);
        assert_eq!(spec.with_field(SortField::Age).direction, SortDirection::Desc);
    }

    #[test]
    fn filters_restore_from_minimal_json() {
        let filters: SearchFilters =
            serde_json::from_str(r#"{"sort":"name:desc","from":24,"size":12}"#).unwrap();
        assert!(filters.breeds.is_empty());
        assert_eq!(filters.from, 24);
        assert_eq!(filters.sort.field, SortField::Name);
    }

    #[test]
    fn filters_persist_with_service_field_names() {
        let filters = SearchFilters {
            breeds: vec!["Pug".into()],
            age_min: Some(2),
            zip_codes: Some(vec!["10001".into()]),
            ..SearchFilters::default()
        };
        let value = serde_json::to_value(&filters).unwrap();
        assert_eq!(value["ageMin"], 2);
        assert_eq!(value["zipCodes"][0], "10001");
        assert_eq!(value["sort"], "breed:asc");
        assert!(value.get("ageMax").is_none());
    }

    #[test]
    fn query_pairs_repeat_list_keys() {
        let filters = SearchFilters {
            breeds: vec!["Pug".into(), "Beagle".into()],
            zip_codes: Some(vec!["10001".into(), "10002".into()]),
            age_max: Some(5),
            from: 12,
            ..SearchFilters::default()
        };
        let pairs = filters.query_pairs();
        let keys: Vec<&str> = pairs.iter().map(|(key, _)| *key).collect();
        assert_eq!(
            keys,
            vec![
                "breeds", "breeds", "zipCodes", "zipCodes", "ageMax", "size", "from", "sort"
            ]
        );
        assert!(pairs.contains(&("from", "12".to_string())));
        assert!(pairs.contains(&("sort", "breed:asc".to_string())));
    }

    #[test]
    fn zero_page_size_falls_back_to_default() {
        let filters = SearchFilters {
            size: 0,
            ..SearchFilters::default()
        };
        assert_eq!(filters.page_size(), DEFAULT_PAGE_SIZE);
        assert!(!filters.has_filters());
    }
}
