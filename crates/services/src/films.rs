//! Film service: entity lifecycle, genre/rating associations, the like
//! index, and the ranking view.
//!
//! Genre links are authoritative in the film->genre join, written with
//! replace semantics on every create and update; read paths re-attach them
//! from the join, using the bulk lookup so listing N films costs one pass,
//! not N queries.

use std::collections::HashSet;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use catalog::{CatalogError, Film, FilmId, Result, UserId, validation};
use storage::{FilmGenreStorage, FilmStorage, GenreStorage, LikeStorage, RatingStorage, UserStorage};

/// Business rules for films, their associations, and likes.
pub struct FilmService<S> {
    store: Arc<S>,
}

impl<S> FilmService<S>
where
    S: FilmStorage + FilmGenreStorage + GenreStorage + RatingStorage + LikeStorage + UserStorage,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a new film. Field rules and genre/rating references are
    /// checked before anything is stored; the genre set is persisted
    /// through the join with duplicates collapsed.
    pub fn create(&self, film: Film) -> Result<Film> {
        info!(name = %film.name, "creating film");
        validation::validate_film(&film)?;
        self.validate_references(&film)?;

        let mut created = self.store.insert_film(film);
        self.store
            .set_genres_for_film(created.id, &created.genre_ids);
        created.genre_ids = self.stored_genre_ids(created.id);
        debug!(film_id = created.id, "film created");
        Ok(created)
    }

    /// Update an existing film, replacing its genre set. Fails with
    /// NotFound when the id is absent; update is never an implicit insert.
    pub fn update(&self, mut film: Film) -> Result<Film> {
        info!(film_id = film.id, "updating film");
        validation::validate_film(&film)?;
        self.validate_references(&film)?;

        if !self.store.update_film(&film) {
            return Err(CatalogError::not_found("film", film.id));
        }
        self.store.set_genres_for_film(film.id, &film.genre_ids);
        film.genre_ids = self.stored_genre_ids(film.id);
        debug!(film_id = film.id, "film updated");
        Ok(film)
    }

    /// All films with their genre sets attached via one bulk join lookup.
    pub fn get_all(&self) -> Vec<Film> {
        let mut films = self.store.all_films();
        let ids: Vec<FilmId> = films.iter().map(|f| f.id).collect();
        let mut genre_map = self.store.genres_by_film_ids(&ids);
        for film in &mut films {
            film.genre_ids = genre_map
                .remove(&film.id)
                .map(|genres| genres.into_iter().map(|g| g.id).collect())
                .unwrap_or_default();
        }
        films
    }

    pub fn get_by_id(&self, id: FilmId) -> Result<Film> {
        let mut film = self
            .store
            .find_film(id)
            .ok_or_else(|| CatalogError::not_found("film", id))?;
        film.genre_ids = self.stored_genre_ids(id);
        Ok(film)
    }

    /// Delete a film. The row delete and the cleanup of its genre links
    /// and like edges happen in one unit of work.
    pub fn delete(&self, id: FilmId) -> Result<()> {
        info!(film_id = id, "deleting film");
        if !self.store.delete_film(id) {
            return Err(CatalogError::not_found("film", id));
        }
        Ok(())
    }

    /// Record that a user likes a film. Liking the same film twice is a
    /// no-op, so retries never double-count.
    pub fn add_like(&self, film_id: FilmId, user_id: UserId) -> Result<()> {
        info!(film_id, user_id, "adding like");
        self.require_film(film_id)?;
        self.require_user(user_id)?;

        if !self.store.add_like(film_id, user_id) {
            debug!(film_id, user_id, "like already present");
        }
        Ok(())
    }

    /// Remove a like. Removing an edge that was never there is a no-op,
    /// but both ids must exist.
    pub fn remove_like(&self, film_id: FilmId, user_id: UserId) -> Result<()> {
        info!(film_id, user_id, "removing like");
        self.require_film(film_id)?;
        self.require_user(user_id)?;

        self.store.remove_like(film_id, user_id);
        Ok(())
    }

    pub fn count_likes(&self, film_id: FilmId) -> Result<usize> {
        self.require_film(film_id)?;
        Ok(self.store.count_likes(film_id))
    }

    /// Ids of every user who likes the film.
    pub fn get_likers(&self, film_id: FilmId) -> Result<HashSet<UserId>> {
        self.require_film(film_id)?;
        Ok(self.store.user_ids_by_film(film_id))
    }

    /// The `limit` most-liked films, descending by like count with
    /// ascending id as the tiebreak. A non-positive limit yields nothing;
    /// a limit beyond the catalog size yields every film.
    pub fn top_liked(&self, limit: i64) -> Vec<Film> {
        info!(limit, "ranking films by like count");
        if limit <= 0 {
            return Vec::new();
        }

        let films = self.get_all();
        let ids: Vec<FilmId> = films.iter().map(|f| f.id).collect();
        let counts = self.store.like_counts(&ids);

        let mut ranked: Vec<(usize, Film)> = films
            .into_par_iter()
            .map(|film| (counts.get(&film.id).copied().unwrap_or(0), film))
            .collect();
        ranked.sort_unstable_by(|(count_a, film_a), (count_b, film_b)| {
            count_b.cmp(count_a).then(film_a.id.cmp(&film_b.id))
        });
        ranked.truncate(limit as usize);
        ranked.into_iter().map(|(_, film)| film).collect()
    }

    /// Reject a film whose genre or rating references point at nothing.
    fn validate_references(&self, film: &Film) -> Result<()> {
        for &genre_id in &film.genre_ids {
            if !self.store.genre_exists(genre_id) {
                return Err(CatalogError::not_found("genre", genre_id));
            }
        }
        if let Some(rating_id) = film.rating_id {
            if !self.store.rating_exists(rating_id) {
                return Err(CatalogError::not_found("rating", rating_id));
            }
        }
        Ok(())
    }

    /// Canonical genre ids as recorded in the join.
    fn stored_genre_ids(&self, film_id: FilmId) -> Vec<catalog::GenreId> {
        self.store
            .genres_by_film_id(film_id)
            .into_iter()
            .map(|g| g.id)
            .collect()
    }

    fn require_film(&self, id: FilmId) -> Result<()> {
        if self.store.film_exists(id) {
            Ok(())
        } else {
            Err(CatalogError::not_found("film", id))
        }
    }

    fn require_user(&self, id: UserId) -> Result<()> {
        if self.store.user_exists(id) {
            Ok(())
        } else {
            Err(CatalogError::not_found("user", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::UserService;
    use chrono::NaiveDate;
    use storage::MemoryStore;

    struct TestEnv {
        store: Arc<MemoryStore>,
        films: FilmService<MemoryStore>,
        users: UserService<MemoryStore>,
    }

    fn create_test_env() -> TestEnv {
        let store = Arc::new(MemoryStore::new());
        TestEnv {
            films: FilmService::new(Arc::clone(&store)),
            users: UserService::new(Arc::clone(&store)),
            store,
        }
    }

    fn draft_film(name: &str) -> Film {
        Film {
            id: 0,
            name: name.to_string(),
            description: "A film".to_string(),
            release_date: NaiveDate::from_ymd_opt(1999, 3, 31).unwrap(),
            duration: 120,
            genre_ids: vec![],
            rating_id: None,
        }
    }

    fn draft_user(login: &str) -> catalog::User {
        catalog::User {
            id: 0,
            email: format!("{login}@example.com"),
            login: login.to_string(),
            name: login.to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 5, 1).unwrap(),
        }
    }

    #[test]
    fn test_create_rejects_pre_cinema_release_date() {
        let env = create_test_env();
        let mut film = draft_film("Too Early");
        film.release_date = NaiveDate::from_ymd_opt(1895, 12, 27).unwrap();

        let err = env.films.create(film).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation { field: "release_date", .. }
        ));
    }

    #[test]
    fn test_create_accepts_floor_release_date() {
        let env = create_test_env();
        let mut film = draft_film("First Screening");
        film.release_date = NaiveDate::from_ymd_opt(1895, 12, 28).unwrap();
        assert!(env.films.create(film).is_ok());
    }

    #[test]
    fn test_create_rejects_unknown_genre() {
        let env = create_test_env();
        let mut film = draft_film("Ghost Genre");
        film.genre_ids = vec![99];

        assert_eq!(
            env.films.create(film).unwrap_err(),
            CatalogError::not_found("genre", 99)
        );
        // Nothing was stored
        assert!(env.films.get_all().is_empty());
    }

    #[test]
    fn test_create_rejects_unknown_rating() {
        let env = create_test_env();
        let mut film = draft_film("Unrated");
        film.rating_id = Some(7);

        assert_eq!(
            env.films.create(film).unwrap_err(),
            CatalogError::not_found("rating", 7)
        );
    }

    #[test]
    fn test_create_collapses_duplicate_genres() {
        let env = create_test_env();
        let action = env.store.get_or_create_genre_id("Action");
        let comedy = env.store.get_or_create_genre_id("Comedy");

        let mut film = draft_film("Hot Fuzz");
        film.genre_ids = vec![action, comedy, action];
        let created = env.films.create(film).unwrap();
        assert_eq!(created.genre_ids, vec![action, comedy]);
    }

    #[test]
    fn test_update_replaces_genre_set() {
        let env = create_test_env();
        let action = env.store.get_or_create_genre_id("Action");
        let comedy = env.store.get_or_create_genre_id("Comedy");
        let drama = env.store.get_or_create_genre_id("Drama");

        let mut film = draft_film("Brazil");
        film.genre_ids = vec![action, comedy];
        let created = env.films.create(film).unwrap();

        let mut updated = created.clone();
        updated.genre_ids = vec![drama];
        let updated = env.films.update(updated).unwrap();

        assert_eq!(updated.genre_ids, vec![drama]);
        assert_eq!(env.films.get_by_id(created.id).unwrap().genre_ids, vec![drama]);
    }

    #[test]
    fn test_update_missing_film_is_not_found() {
        let env = create_test_env();
        let mut film = draft_film("Nowhere");
        film.id = 42;
        assert_eq!(
            env.films.update(film).unwrap_err(),
            CatalogError::not_found("film", 42)
        );
    }

    #[test]
    fn test_get_all_attaches_genres() {
        let env = create_test_env();
        let action = env.store.get_or_create_genre_id("Action");

        let mut film = draft_film("Speed");
        film.genre_ids = vec![action];
        env.films.create(film).unwrap();
        env.films.create(draft_film("Plain")).unwrap();

        let all = env.films.get_all();
        let speed = all.iter().find(|f| f.name == "Speed").unwrap();
        let plain = all.iter().find(|f| f.name == "Plain").unwrap();
        assert_eq!(speed.genre_ids, vec![action]);
        assert!(plain.genre_ids.is_empty());
    }

    #[test]
    fn test_add_like_is_idempotent() {
        let env = create_test_env();
        let user = env.users.create(draft_user("al")).unwrap();
        let film = env.films.create(draft_film("Alien")).unwrap();

        env.films.add_like(film.id, user.id).unwrap();
        env.films.add_like(film.id, user.id).unwrap();

        assert_eq!(env.films.count_likes(film.id).unwrap(), 1);
        assert!(env.films.get_likers(film.id).unwrap().contains(&user.id));
    }

    #[test]
    fn test_like_requires_existing_film_and_user() {
        let env = create_test_env();
        let user = env.users.create(draft_user("al")).unwrap();
        let film = env.films.create(draft_film("Alien")).unwrap();

        assert_eq!(
            env.films.add_like(99, user.id).unwrap_err(),
            CatalogError::not_found("film", 99)
        );
        assert_eq!(
            env.films.add_like(film.id, 99).unwrap_err(),
            CatalogError::not_found("user", 99)
        );
    }

    #[test]
    fn test_remove_like_never_liked_is_noop() {
        let env = create_test_env();
        let user = env.users.create(draft_user("al")).unwrap();
        let film = env.films.create(draft_film("Alien")).unwrap();

        env.films.remove_like(film.id, user.id).unwrap();
        assert_eq!(env.films.count_likes(film.id).unwrap(), 0);
    }

    #[test]
    fn test_delete_user_removes_their_likes() {
        let env = create_test_env();
        let user = env.users.create(draft_user("al")).unwrap();
        let film = env.films.create(draft_film("Alien")).unwrap();

        env.films.add_like(film.id, user.id).unwrap();
        env.users.delete(user.id).unwrap();
        assert_eq!(env.films.count_likes(film.id).unwrap(), 0);
    }

    #[test]
    fn test_top_liked_orders_by_count_then_id() {
        let env = create_test_env();
        let u1 = env.users.create(draft_user("al")).unwrap();
        let u2 = env.users.create(draft_user("bea")).unwrap();
        let f1 = env.films.create(draft_film("One")).unwrap();
        let f2 = env.films.create(draft_film("Two")).unwrap();
        let f3 = env.films.create(draft_film("Three")).unwrap();

        // f2 gets two likes, f1 and f3 one each
        env.films.add_like(f2.id, u1.id).unwrap();
        env.films.add_like(f2.id, u2.id).unwrap();
        env.films.add_like(f1.id, u1.id).unwrap();
        env.films.add_like(f3.id, u2.id).unwrap();

        let top = env.films.top_liked(10);
        let ids: Vec<FilmId> = top.iter().map(|f| f.id).collect();
        // Tie between f1 and f3 breaks toward the lower id
        assert_eq!(ids, vec![f2.id, f1.id, f3.id]);
    }

    #[test]
    fn test_top_liked_limit_edges() {
        let env = create_test_env();
        env.films.create(draft_film("One")).unwrap();
        env.films.create(draft_film("Two")).unwrap();

        assert!(env.films.top_liked(0).is_empty());
        assert!(env.films.top_liked(-5).is_empty());
        assert_eq!(env.films.top_liked(1).len(), 1);
        assert_eq!(env.films.top_liked(100).len(), 2);
    }

    #[test]
    fn test_delete_film_then_count_is_not_found() {
        let env = create_test_env();
        let film = env.films.create(draft_film("Gone")).unwrap();

        env.films.delete(film.id).unwrap();
        assert_eq!(
            env.films.count_likes(film.id).unwrap_err(),
            CatalogError::not_found("film", film.id)
        );
        assert_eq!(
            env.films.delete(film.id).unwrap_err(),
            CatalogError::not_found("film", film.id)
        );
    }
}
