//! In-memory persistence collaborator.
//!
//! One struct implements the whole capability set over a single table set
//! guarded by one `RwLock`. Every trait operation acquires the guard
//! exactly once, which makes each operation atomic on its own and makes a
//! cascade delete (row plus dependent edges) a single unit of work.
//!
//! The get-or-create catalog operations run under the write guard, so the
//! "two callers first-see the same name" race cannot produce two rows
//! here. A collaborator that cannot serialize that lookup is allowed to
//! resolve the race to two rows; the catalog is small and pre-seeded in
//! practice, so that outcome is treated as a data-quality issue rather
//! than a correctness failure.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use catalog::{Film, FilmId, FriendshipStatus, Genre, GenreId, RatingClass, RatingId, User, UserId};

use crate::id::IdSequence;
use crate::traits::{
    FilmGenreStorage, FilmStorage, FriendStorage, GenreStorage, LikeStorage, RatingStorage,
    UserStorage,
};

/// All tables, kept together so one guard covers any composed operation.
#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    films: HashMap<FilmId, Film>,
    // BTreeMap keeps catalog listings in ascending id order
    genres: BTreeMap<GenreId, Genre>,
    ratings: BTreeMap<RatingId, RatingClass>,
    // film -> genre ids, insertion-ordered per film
    film_genres: HashMap<FilmId, Vec<GenreId>>,
    // film -> liker ids
    likes: HashMap<FilmId, HashSet<UserId>>,
    // user -> outgoing friendship edges with status
    friends: HashMap<UserId, HashMap<UserId, FriendshipStatus>>,
}

/// In-memory store implementing every storage trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    user_seq: IdSequence,
    film_seq: IdSequence,
    genre_seq: IdSequence,
    rating_seq: IdSequence,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().expect("storage lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().expect("storage lock poisoned")
    }
}

impl UserStorage for MemoryStore {
    fn insert_user(&self, mut user: User) -> User {
        user.id = self.user_seq.next();
        debug!(user_id = user.id, login = %user.login, "inserting user");
        self.write().users.insert(user.id, user.clone());
        user
    }

    fn update_user(&self, user: &User) -> bool {
        let mut tables = self.write();
        match tables.users.get_mut(&user.id) {
            Some(row) => {
                *row = user.clone();
                true
            }
            None => false,
        }
    }

    fn delete_user(&self, id: UserId) -> bool {
        // Row delete and edge cleanup share one write guard: the cascade
        // is all-or-nothing and no reader can observe an orphaned edge.
        let mut tables = self.write();
        if tables.users.remove(&id).is_none() {
            return false;
        }
        for likers in tables.likes.values_mut() {
            likers.remove(&id);
        }
        tables.friends.remove(&id);
        for outgoing in tables.friends.values_mut() {
            outgoing.remove(&id);
        }
        debug!(user_id = id, "deleted user and its edges");
        true
    }

    fn find_user(&self, id: UserId) -> Option<User> {
        self.read().users.get(&id).cloned()
    }

    fn find_users(&self, ids: &[UserId]) -> Vec<User> {
        let tables = self.read();
        ids.iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect()
    }

    fn all_users(&self) -> Vec<User> {
        self.read().users.values().cloned().collect()
    }

    fn user_exists(&self, id: UserId) -> bool {
        self.read().users.contains_key(&id)
    }
}

impl FilmStorage for MemoryStore {
    fn insert_film(&self, mut film: Film) -> Film {
        film.id = self.film_seq.next();
        debug!(film_id = film.id, name = %film.name, "inserting film");
        self.write().films.insert(film.id, film.clone());
        film
    }

    fn update_film(&self, film: &Film) -> bool {
        let mut tables = self.write();
        match tables.films.get_mut(&film.id) {
            Some(row) => {
                *row = film.clone();
                true
            }
            None => false,
        }
    }

    fn delete_film(&self, id: FilmId) -> bool {
        let mut tables = self.write();
        if tables.films.remove(&id).is_none() {
            return false;
        }
        tables.film_genres.remove(&id);
        tables.likes.remove(&id);
        debug!(film_id = id, "deleted film and its edges");
        true
    }

    fn find_film(&self, id: FilmId) -> Option<Film> {
        self.read().films.get(&id).cloned()
    }

    fn all_films(&self) -> Vec<Film> {
        self.read().films.values().cloned().collect()
    }

    fn film_exists(&self, id: FilmId) -> bool {
        self.read().films.contains_key(&id)
    }
}

impl GenreStorage for MemoryStore {
    fn get_or_create_genre_id(&self, name: &str) -> GenreId {
        let mut tables = self.write();
        if let Some(genre) = tables.genres.values().find(|g| g.name == name) {
            return genre.id;
        }
        let id = self.genre_seq.next();
        debug!(genre_id = id, name, "creating genre");
        tables.genres.insert(
            id,
            Genre {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    fn find_genre(&self, id: GenreId) -> Option<Genre> {
        self.read().genres.get(&id).cloned()
    }

    fn all_genres(&self) -> Vec<Genre> {
        self.read().genres.values().cloned().collect()
    }

    fn genre_exists(&self, id: GenreId) -> bool {
        self.read().genres.contains_key(&id)
    }
}

impl RatingStorage for MemoryStore {
    fn get_or_create_rating_id(&self, name: &str, description: Option<&str>) -> RatingId {
        let mut tables = self.write();
        if let Some(rating) = tables.ratings.values().find(|r| r.name == name) {
            return rating.id;
        }
        let id = self.rating_seq.next();
        debug!(rating_id = id, name, "creating rating class");
        tables.ratings.insert(
            id,
            RatingClass {
                id,
                name: name.to_string(),
                description: description.map(str::to_string),
            },
        );
        id
    }

    fn find_rating(&self, id: RatingId) -> Option<RatingClass> {
        self.read().ratings.get(&id).cloned()
    }

    fn all_ratings(&self) -> Vec<RatingClass> {
        self.read().ratings.values().cloned().collect()
    }

    fn rating_exists(&self, id: RatingId) -> bool {
        self.read().ratings.contains_key(&id)
    }
}

impl FilmGenreStorage for MemoryStore {
    fn set_genres_for_film(&self, film_id: FilmId, genre_ids: &[GenreId]) {
        // Replace semantics: drop the old links, insert the new set with
        // duplicates collapsed and insertion order kept.
        let mut deduped = Vec::with_capacity(genre_ids.len());
        let mut seen = HashSet::new();
        for &genre_id in genre_ids {
            if seen.insert(genre_id) {
                deduped.push(genre_id);
            }
        }

        let mut tables = self.write();
        if deduped.is_empty() {
            tables.film_genres.remove(&film_id);
        } else {
            tables.film_genres.insert(film_id, deduped);
        }
    }

    fn genres_by_film_id(&self, film_id: FilmId) -> Vec<Genre> {
        let tables = self.read();
        tables
            .film_genres
            .get(&film_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| tables.genres.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn genres_by_film_ids(&self, film_ids: &[FilmId]) -> HashMap<FilmId, Vec<Genre>> {
        // One guard, one pass over the requested ids
        let tables = self.read();
        let mut result = HashMap::new();
        for &film_id in film_ids {
            if let Some(ids) = tables.film_genres.get(&film_id) {
                let genres: Vec<Genre> = ids
                    .iter()
                    .filter_map(|id| tables.genres.get(id).cloned())
                    .collect();
                result.insert(film_id, genres);
            }
        }
        result
    }
}

impl LikeStorage for MemoryStore {
    fn add_like(&self, film_id: FilmId, user_id: UserId) -> bool {
        self.write().likes.entry(film_id).or_default().insert(user_id)
    }

    fn remove_like(&self, film_id: FilmId, user_id: UserId) -> bool {
        let mut tables = self.write();
        match tables.likes.get_mut(&film_id) {
            Some(likers) => likers.remove(&user_id),
            None => false,
        }
    }

    fn has_like(&self, film_id: FilmId, user_id: UserId) -> bool {
        self.read()
            .likes
            .get(&film_id)
            .is_some_and(|likers| likers.contains(&user_id))
    }

    fn count_likes(&self, film_id: FilmId) -> usize {
        self.read().likes.get(&film_id).map_or(0, HashSet::len)
    }

    fn user_ids_by_film(&self, film_id: FilmId) -> HashSet<UserId> {
        self.read().likes.get(&film_id).cloned().unwrap_or_default()
    }

    fn like_counts(&self, film_ids: &[FilmId]) -> HashMap<FilmId, usize> {
        let tables = self.read();
        film_ids
            .iter()
            .filter_map(|id| tables.likes.get(id).map(|likers| (*id, likers.len())))
            .collect()
    }
}

impl FriendStorage for MemoryStore {
    fn friendship_exists(&self, user_id: UserId, friend_id: UserId) -> bool {
        self.read()
            .friends
            .get(&user_id)
            .is_some_and(|outgoing| outgoing.contains_key(&friend_id))
    }

    fn add_friendship(&self, user_id: UserId, friend_id: UserId, status: FriendshipStatus) {
        debug!(user_id, friend_id, ?status, "adding friendship edge");
        self.write()
            .friends
            .entry(user_id)
            .or_default()
            .insert(friend_id, status);
    }

    fn remove_friendship(&self, user_id: UserId, friend_id: UserId) -> bool {
        let mut tables = self.write();
        match tables.friends.get_mut(&user_id) {
            Some(outgoing) => outgoing.remove(&friend_id).is_some(),
            None => false,
        }
    }

    fn update_friendship_status(
        &self,
        user_id: UserId,
        friend_id: UserId,
        status: FriendshipStatus,
    ) -> bool {
        let mut tables = self.write();
        match tables
            .friends
            .get_mut(&user_id)
            .and_then(|outgoing| outgoing.get_mut(&friend_id))
        {
            Some(current) => {
                *current = status;
                true
            }
            None => false,
        }
    }

    fn friendship_status(&self, user_id: UserId, friend_id: UserId) -> Option<FriendshipStatus> {
        self.read()
            .friends
            .get(&user_id)
            .and_then(|outgoing| outgoing.get(&friend_id))
            .copied()
    }

    fn friend_ids(&self, user_id: UserId) -> HashSet<UserId> {
        self.read()
            .friends
            .get(&user_id)
            .map(|outgoing| outgoing.keys().copied().collect())
            .unwrap_or_default()
    }

    fn common_friend_ids(&self, user_id: UserId, other_id: UserId) -> HashSet<UserId> {
        // Single set intersection under one guard
        let tables = self.read();
        match (tables.friends.get(&user_id), tables.friends.get(&other_id)) {
            (Some(a), Some(b)) => {
                let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
                small
                    .keys()
                    .filter(|id| large.contains_key(*id))
                    .copied()
                    .collect()
            }
            _ => HashSet::new(),
        }
    }
}
