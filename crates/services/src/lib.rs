//! # Services Crate
//!
//! The consistency core of the social film catalog: entity lifecycle with
//! validation, the like index and friendship graph rules, reference-data
//! access, and the like-count ranking view. Services talk to storage only
//! through the capability traits in the `storage` crate.

pub mod films;
pub mod genres;
pub mod ratings;
pub mod users;

pub use films::FilmService;
pub use genres::GenreService;
pub use ratings::RatingService;
pub use users::UserService;
