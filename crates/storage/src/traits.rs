//! The persistence-collaborator capability set.
//!
//! The service layer talks to storage exclusively through these traits, so
//! a database-backed collaborator can replace the in-memory one without
//! touching any business rule. The capabilities mirror what the core
//! actually needs: atomic insert with id generation, row update/delete
//! with affected-row semantics, point and bulk (in-list) queries, and
//! cascade deletes executed as one atomic unit of work.
//!
//! Storage owns durability only. Existence checks, validation, and
//! conflict detection are the service layer's job; the one exception is
//! cascade cleanup, which has to happen in the same unit of work as the
//! row delete and therefore lives behind `delete_user` / `delete_film`.

use std::collections::{HashMap, HashSet};

use catalog::{Film, FilmId, FriendshipStatus, Genre, GenreId, RatingClass, RatingId, User, UserId};

/// Authoritative store for user records.
pub trait UserStorage: Send + Sync {
    /// Insert a new user, assigning its id. Returns the stored record.
    fn insert_user(&self, user: User) -> User;

    /// Overwrite an existing row. Returns false when the id is absent
    /// (update is never an implicit insert).
    fn update_user(&self, user: &User) -> bool;

    /// Delete the row and every like / friendship edge referencing it, as
    /// one atomic unit of work. Returns false when the id is absent.
    fn delete_user(&self, id: UserId) -> bool;

    fn find_user(&self, id: UserId) -> Option<User>;

    /// Bulk point lookup; absent ids are silently skipped.
    fn find_users(&self, ids: &[UserId]) -> Vec<User>;

    fn all_users(&self) -> Vec<User>;

    fn user_exists(&self, id: UserId) -> bool;
}

/// Authoritative store for film records.
pub trait FilmStorage: Send + Sync {
    /// Insert a new film, assigning its id. Returns the stored record.
    fn insert_film(&self, film: Film) -> Film;

    /// Overwrite an existing row. Returns false when the id is absent.
    fn update_film(&self, film: &Film) -> bool;

    /// Delete the row and every genre link / like edge referencing it, as
    /// one atomic unit of work. Returns false when the id is absent.
    fn delete_film(&self, id: FilmId) -> bool;

    fn find_film(&self, id: FilmId) -> Option<Film>;

    fn all_films(&self) -> Vec<Film>;

    fn film_exists(&self, id: FilmId) -> bool;
}

/// Normalized genre catalog: a name maps to exactly one id.
pub trait GenreStorage: Send + Sync {
    /// Resolve a name to its id, inserting a new row on first sighting.
    fn get_or_create_genre_id(&self, name: &str) -> GenreId;

    fn find_genre(&self, id: GenreId) -> Option<Genre>;

    /// All genres in ascending id order.
    fn all_genres(&self) -> Vec<Genre>;

    fn genre_exists(&self, id: GenreId) -> bool;
}

/// Normalized rating-class catalog.
pub trait RatingStorage: Send + Sync {
    /// Resolve a name to its id, inserting a new row on first sighting.
    /// The description is only stored when the row is created.
    fn get_or_create_rating_id(&self, name: &str, description: Option<&str>) -> RatingId;

    fn find_rating(&self, id: RatingId) -> Option<RatingClass>;

    /// All rating classes in ascending id order.
    fn all_ratings(&self) -> Vec<RatingClass>;

    fn rating_exists(&self, id: RatingId) -> bool;
}

/// The film -> genre join.
pub trait FilmGenreStorage: Send + Sync {
    /// Replace every genre link of the film with the given set. Duplicates
    /// collapse, insertion order is preserved, and an empty slice leaves
    /// the film with no genres.
    fn set_genres_for_film(&self, film_id: FilmId, genre_ids: &[GenreId]);

    /// Genres of one film, in the insertion order of the last replace.
    fn genres_by_film_id(&self, film_id: FilmId) -> Vec<Genre>;

    /// Genres for many films in a single pass. Films without any link are
    /// absent from the result map.
    fn genres_by_film_ids(&self, film_ids: &[FilmId]) -> HashMap<FilmId, Vec<Genre>>;
}

/// The user <-> film like edge set.
pub trait LikeStorage: Send + Sync {
    /// Add the edge. Returns false when it was already present; the edge
    /// set is unchanged either way.
    fn add_like(&self, film_id: FilmId, user_id: UserId) -> bool;

    /// Remove the edge. Returns false when it was absent.
    fn remove_like(&self, film_id: FilmId, user_id: UserId) -> bool;

    fn has_like(&self, film_id: FilmId, user_id: UserId) -> bool;

    fn count_likes(&self, film_id: FilmId) -> usize;

    fn user_ids_by_film(&self, film_id: FilmId) -> HashSet<UserId>;

    /// Like counts for many films in a single pass. Films without likes
    /// are absent from the result map.
    fn like_counts(&self, film_ids: &[FilmId]) -> HashMap<FilmId, usize>;
}

/// The directed, status-bearing friendship edge set.
pub trait FriendStorage: Send + Sync {
    fn friendship_exists(&self, user_id: UserId, friend_id: UserId) -> bool;

    /// Insert the ordered edge. The caller guarantees the edge does not
    /// already exist and that `user_id != friend_id`.
    fn add_friendship(&self, user_id: UserId, friend_id: UserId, status: FriendshipStatus);

    /// Remove the ordered edge. Returns false when it was absent.
    fn remove_friendship(&self, user_id: UserId, friend_id: UserId) -> bool;

    /// Change the status of an existing edge. Returns false when the edge
    /// is absent.
    fn update_friendship_status(
        &self,
        user_id: UserId,
        friend_id: UserId,
        status: FriendshipStatus,
    ) -> bool;

    fn friendship_status(&self, user_id: UserId, friend_id: UserId) -> Option<FriendshipStatus>;

    /// Ids of every user `user_id` has an outgoing edge to.
    fn friend_ids(&self, user_id: UserId) -> HashSet<UserId>;

    /// Intersection of the two users' outgoing friend sets, computed in a
    /// single pass at the storage boundary.
    fn common_friend_ids(&self, user_id: UserId, other_id: UserId) -> HashSet<UserId>;
}
