//! Core domain types for the social film catalog.
//!
//! Users and films are the two entity kinds; likes and friendships are
//! edges between their ids, and genres / rating classes form the
//! normalized reference catalog attached to films.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up the four id spaces

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a film
pub type FilmId = u32;

/// Unique identifier for a genre in the reference catalog
pub type GenreId = u32;

/// Unique identifier for a rating class in the reference catalog
pub type RatingId = u32;

// =============================================================================
// User
// =============================================================================

/// A registered user.
///
/// `name` falls back to `login` whenever it is blank at create or update
/// time; that fill happens in the service layer before anything is stored,
/// so a persisted user never has an empty name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Assigned by the store on creation; never reused.
    pub id: UserId,
    pub email: String,
    /// Unique handle, no whitespace allowed.
    pub login: String,
    /// Display name; defaults to `login` when blank.
    pub name: String,
    pub birthday: NaiveDate,
}

/// Status of a directed friendship edge.
///
/// The default add path writes `Confirmed` directly; `Pending` exists so a
/// two-step request/confirm handshake can be layered on without a schema
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FriendshipStatus {
    Pending,
    Confirmed,
}

// =============================================================================
// Film
// =============================================================================

/// A film in the catalog.
///
/// `genre_ids` keeps insertion order for display but is a set in spirit:
/// duplicates collapse when the associations are stored. `rating_id` is the
/// single nullable pointer into the rating-class catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    /// Assigned by the store on creation; never reused.
    pub id: FilmId,
    pub name: String,
    /// Free text, at most 200 characters.
    pub description: String,
    /// Never earlier than the first public film screening (1895-12-28).
    pub release_date: NaiveDate,
    /// Runtime in minutes, strictly positive.
    pub duration: u32,
    /// Genre references, insertion-ordered, duplicates collapsed.
    pub genre_ids: Vec<GenreId>,
    /// Optional rating-class reference.
    pub rating_id: Option<RatingId>,
}

// =============================================================================
// Reference catalog
// =============================================================================

/// A genre row: a name resolved to a stable id for the lifetime of the
/// system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// A content-rating class (G, PG, PG-13, ...), with an optional free-text
/// description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingClass {
    pub id: RatingId,
    pub name: String,
    pub description: Option<String>,
}
