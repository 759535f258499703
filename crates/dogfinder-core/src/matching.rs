//! Match a favorite through the service.

use dogfinder_api_models::{Dog, MatchResponse};
use thiserror::Error;

use crate::api::{ApiError, DogApi};
use crate::favorites::Favorites;

/// Failures of the match flow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// No favorites to submit.
    #[error("Please select at least one dog to match with")]
    NoFavorites,
    /// The service returned an id that is not a favorite.
    #[error("matched dog '{0}' is not among your favorites")]
    UnknownMatch(String),
    /// The match call failed.
    #[error("Failed to generate match: {0}")]
    Api(#[from] ApiError),
}

/// Candidate ids to submit, in favorites order.
///
/// # Errors
///
/// Returns [`MatchError::NoFavorites`] when `favorites` is empty.
pub fn match_candidates(favorites: &Favorites) -> Result<Vec<String>, MatchError> {
    if favorites.is_empty() {
        return Err(MatchError::NoFavorites);
    }
    Ok(favorites.ids())
}

/// Resolve the service's pick to a favorite record.
///
/// # Errors
///
/// Returns [`MatchError::UnknownMatch`] when the id is not a favorite.
pub fn resolve_match(favorites: &Favorites, response: &MatchResponse) -> Result<Dog, MatchError> {
    favorites
        .get(&response.matched)
        .cloned()
        .ok_or_else(|| MatchError::UnknownMatch(response.matched.clone()))
}

/// Submit every favorite and return the matched record.
///
/// # Errors
///
/// See [`match_candidates`] and [`resolve_match`]; service failures are
/// wrapped in [`MatchError::Api`].
pub async fn request_match(api: &dyn DogApi, favorites: &Favorites) -> Result<Dog, MatchError> {
    let candidates = match_candidates(favorites)?;
    let response = api.match_dogs(&candidates).await?;
    resolve_match(favorites, &response)
}

/// Celebration text for a match.
#[must_use]
pub fn match_message(dog: &Dog) -> String {
    format!("You've been matched with {}!", dog.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn favorites() -> Favorites {
        Favorites::from_dogs([Dog {
            id: "d1".into(),
            img: String::new(),
            name: "Biscuit".into(),
            age: 4,
            zip_code: "10001".into(),
            breed: "Pug".into(),
        }])
    }

    #[test]
    fn empty_favorites_cannot_match() {
        let err = match_candidates(&Favorites::default()).unwrap_err();
        assert_eq!(err.to_string(), "Please select at least one dog to match with");
    }

    #[test]
    fn resolves_known_ids_only() {
        let favs = favorites();
        let dog = resolve_match(
            &favs,
            &MatchResponse {
                matched: "d1".into(),
            },
        )
        .unwrap();
        assert_eq!(match_message(&dog), "You've been matched with Biscuit!");

        let unknown = resolve_match(
            &favs,
            &MatchResponse {
                matched: "zz".into(),
            },
        );
        assert_eq!(unknown, Err(MatchError::UnknownMatch("zz".into())));
    }
}
