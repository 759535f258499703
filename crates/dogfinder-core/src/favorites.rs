//! Favorited dogs, keyed by id and kept in insertion order.

use std::collections::BTreeSet;

use dogfinder_api_models::Dog;
use serde::Deserialize;

use crate::storage::StorageHandle;

/// Session-storage key holding the favorites list.
pub const FAVORITES_KEY: &str = "favorite-dogs";

/// Ordered favorites set with at most one record per id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    dogs: Vec<Dog>,
}

impl Favorites {
    /// Build a set from records; later duplicates replace earlier ones.
    #[must_use]
    pub fn from_dogs(dogs: impl IntoIterator<Item = Dog>) -> Self {
        let mut favorites = Self::default();
        for dog in dogs {
            favorites.add(dog);
        }
        favorites
    }

    /// Upsert by id. The stored record moves to the end.
    pub fn add(&mut self, dog: Dog) {
        self.dogs.retain(|existing| existing.id != dog.id);
        self.dogs.push(dog);
    }

    /// Remove the record with `id`. Returns whether one was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.dogs.len();
        self.dogs.retain(|existing| existing.id != id);
        before != self.dogs.len()
    }

    /// Remove when present, otherwise add. Returns whether `dog` is now a favorite.
    pub fn toggle(&mut self, dog: Dog) -> bool {
        if self.remove(&dog.id) {
            false
        } else {
            self.dogs.push(dog);
            true
        }
    }

    /// Whether `id` is favorited.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.dogs.iter().any(|dog| dog.id == id)
    }

    /// Record for `id`, if favorited.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Dog> {
        self.dogs.iter().find(|dog| dog.id == id)
    }

    /// Favorited ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.dogs.iter().map(|dog| dog.id.clone()).collect()
    }

    /// Sorted, de-duplicated breeds present among the favorites.
    #[must_use]
    pub fn breeds(&self) -> Vec<String> {
        self.dogs
            .iter()
            .map(|dog| dog.breed.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Records in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[Dog] {
        &self.dogs
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dogs.len()
    }

    /// Whether nothing is favorited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dogs.is_empty()
    }
}

/// Shapes the favorites key has been written in over time.
#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedFavorites {
    List(Vec<Dog>),
    Pairs(Vec<(String, Dog)>),
    Envelope { state: EnvelopeState },
}

#[derive(Deserialize)]
struct EnvelopeState {
    #[serde(default)]
    favorites: Vec<Dog>,
}

impl PersistedFavorites {
    fn into_dogs(self) -> Vec<Dog> {
        match self {
            Self::List(dogs) => dogs,
            Self::Pairs(pairs) => pairs.into_iter().map(|(_, dog)| dog).collect(),
            Self::Envelope { state } => state.favorites,
        }
    }
}

/// Favorites bound to a store; every mutation is written through.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoritesStore {
    store: StorageHandle,
    favorites: Favorites,
}

impl FavoritesStore {
    /// Load favorites from `store`; unreadable data restores as empty.
    #[must_use]
    pub fn restore(store: StorageHandle) -> Self {
        let favorites = store
            .load_json::<PersistedFavorites>(FAVORITES_KEY)
            .map(|persisted| Favorites::from_dogs(persisted.into_dogs()))
            .unwrap_or_default();
        Self { store, favorites }
    }

    /// Current favorites.
    #[must_use]
    pub const fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    /// Upsert and persist.
    pub fn add(&mut self, dog: Dog) {
        self.favorites.add(dog);
        self.persist();
    }

    /// Remove and persist.
    pub fn remove(&mut self, id: &str) -> bool {
        let removed = self.favorites.remove(id);
        if removed {
            self.persist();
        }
        removed
    }

    /// Toggle and persist. Returns whether `dog` is now a favorite.
    pub fn toggle(&mut self, dog: Dog) -> bool {
        let added = self.favorites.toggle(dog);
        self.persist();
        added
    }

    fn persist(&self) {
        self.store
            .persist_json(FAVORITES_KEY, self.favorites.as_slice());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dog(id: &str, name: &str, breed: &str) -> Dog {
        Dog {
            id: id.into(),
            img: format!("https://img/{id}.jpg"),
            name: name.into(),
            age: 3,
            zip_code: "10001".into(),
            breed: breed.into(),
        }
    }

    #[test]
    fn add_is_an_upsert() {
        let mut favorites = Favorites::default();
        favorites.add(dog("a", "Rex", "Pug"));
        favorites.add(dog("b", "Ada", "Beagle"));
        favorites.add(dog("a", "Rex II", "Pug"));
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites.get("a").map(|d| d.name.as_str()), Some("Rex II"));
        assert_eq!(favorites.ids(), vec!["b", "a"]);
    }

    #[test]
    fn toggle_twice_restores_the_set() {
        let mut favorites = Favorites::from_dogs([dog("a", "Rex", "Pug")]);
        let original = favorites.clone();
        assert!(favorites.toggle(dog("b", "Ada", "Beagle")));
        assert!(!favorites.toggle(dog("b", "Ada", "Beagle")));
        assert_eq!(favorites, original);
    }

    #[test]
    fn remove_missing_is_a_no_op() {
        let mut favorites = Favorites::from_dogs([dog("a", "Rex", "Pug")]);
        assert!(!favorites.remove("zzz"));
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn breeds_are_sorted_and_unique() {
        let favorites = Favorites::from_dogs([
            dog("a", "Rex", "Pug"),
            dog("b", "Ada", "Beagle"),
            dog("c", "Max", "Pug"),
        ]);
        assert_eq!(favorites.breeds(), vec!["Beagle", "Pug"]);
    }

    #[test]
    fn store_writes_through_and_restores() {
        let handle = StorageHandle::memory();
        let mut store = FavoritesStore::restore(handle.clone());
        store.add(dog("a", "Rex", "Pug"));
        store.toggle(dog("b", "Ada", "Beagle"));
        let restored = FavoritesStore::restore(handle);
        assert_eq!(restored.favorites().ids(), vec!["a", "b"]);
    }

    #[test]
    fn restore_accepts_legacy_pairs_and_envelopes() {
        let handle = StorageHandle::memory();
        let record = serde_json::to_value(dog("a", "Rex", "Pug")).unwrap();

        let pairs = serde_json::json!([["a", record.clone()]]);
        handle.write(FAVORITES_KEY, &pairs.to_string()).unwrap();
        assert_eq!(FavoritesStore::restore(handle.clone()).favorites().len(), 1);

        let envelope = serde_json::json!({"state": {"favorites": [record.clone(), record]}, "version": 0});
        handle.write(FAVORITES_KEY, &envelope.to_string()).unwrap();
        assert_eq!(FavoritesStore::restore(handle.clone()).favorites().len(), 1);

        handle.write(FAVORITES_KEY, "\"garbage\"").unwrap();
        assert!(FavoritesStore::restore(handle).favorites().is_empty());
    }
}
