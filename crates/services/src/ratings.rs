//! Rating service: read access to the content-rating reference catalog.

use std::sync::Arc;

use tracing::info;

use catalog::{CatalogError, RatingClass, RatingId, Result};
use storage::RatingStorage;

/// Business rules for the rating-class reference catalog.
pub struct RatingService<S> {
    store: Arc<S>,
}

impl<S> RatingService<S>
where
    S: RatingStorage,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// All rating classes, ascending by id.
    pub fn get_all(&self) -> Vec<RatingClass> {
        info!("listing rating classes");
        self.store.all_ratings()
    }

    pub fn get_by_id(&self, id: RatingId) -> Result<RatingClass> {
        self.store
            .find_rating(id)
            .ok_or_else(|| CatalogError::not_found("rating", id))
    }

    /// Resolve a name to its rating class, creating the row on first
    /// sighting.
    pub fn get_or_create(&self, name: &str, description: Option<&str>) -> RatingClass {
        let id = self.store.get_or_create_rating_id(name, description);
        self.store
            .find_rating(id)
            .expect("rating row exists after get-or-create")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::MemoryStore;

    fn create_test_service() -> RatingService<MemoryStore> {
        RatingService::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_get_or_create_is_stable() {
        let service = create_test_service();
        let first = service.get_or_create("PG-13", Some("Parents strongly cautioned"));
        let second = service.get_or_create("PG-13", None);
        assert_eq!(first.id, second.id);
        assert_eq!(
            second.description.as_deref(),
            Some("Parents strongly cautioned")
        );
    }

    #[test]
    fn test_get_by_id_unknown_is_not_found() {
        let service = create_test_service();
        assert_eq!(
            service.get_by_id(3).unwrap_err(),
            CatalogError::not_found("rating", 3)
        );
    }
}
