//! Genre service: read access to the normalized genre catalog.

use std::sync::Arc;

use tracing::{debug, info};

use catalog::{CatalogError, Genre, GenreId, Result};
use storage::GenreStorage;

/// Business rules for the genre reference catalog.
pub struct GenreService<S> {
    store: Arc<S>,
}

impl<S> GenreService<S>
where
    S: GenreStorage,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// All genres, ascending by id.
    pub fn get_all(&self) -> Vec<Genre> {
        info!("listing genres");
        let genres = self.store.all_genres();
        debug!(count = genres.len(), "genres found");
        genres
    }

    pub fn get_by_id(&self, id: GenreId) -> Result<Genre> {
        self.store
            .find_genre(id)
            .ok_or_else(|| CatalogError::not_found("genre", id))
    }

    /// Resolve a name to its genre, creating the row on first sighting.
    /// The same name always resolves to the same id.
    pub fn get_or_create(&self, name: &str) -> Genre {
        let id = self.store.get_or_create_genre_id(name);
        self.store
            .find_genre(id)
            .expect("genre row exists after get-or-create")
    }

    /// Reject any genre id that points at nothing. Used by film
    /// create/update before the film is persisted.
    pub fn validate_ids(&self, ids: &[GenreId]) -> Result<()> {
        for &id in ids {
            if !self.store.genre_exists(id) {
                return Err(CatalogError::not_found("genre", id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::MemoryStore;

    fn create_test_service() -> GenreService<MemoryStore> {
        GenreService::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_get_or_create_returns_same_id_twice() {
        let service = create_test_service();
        let first = service.get_or_create("Comedy");
        let second = service.get_or_create("Comedy");
        assert_eq!(first.id, second.id);
        assert_eq!(first.name, "Comedy");
    }

    #[test]
    fn test_get_by_id_unknown_is_not_found() {
        let service = create_test_service();
        assert_eq!(
            service.get_by_id(9).unwrap_err(),
            CatalogError::not_found("genre", 9)
        );
    }

    #[test]
    fn test_validate_ids_reports_first_unknown() {
        let service = create_test_service();
        let comedy = service.get_or_create("Comedy");

        assert!(service.validate_ids(&[comedy.id]).is_ok());
        assert_eq!(
            service.validate_ids(&[comedy.id, 42]).unwrap_err(),
            CatalogError::not_found("genre", 42)
        );
    }

    #[test]
    fn test_get_all_ascending_by_id() {
        let service = create_test_service();
        service.get_or_create("Drama");
        service.get_or_create("Comedy");

        let names: Vec<String> = service.get_all().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Drama", "Comedy"]);
    }
}
