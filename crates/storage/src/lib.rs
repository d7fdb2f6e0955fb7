//! # Storage Crate
//!
//! The persistence collaborator for the catalog core: the capability
//! traits the services depend on, id allocation, and the in-memory
//! implementation used by tests and the demo harness.
//!
//! ## Main Components
//!
//! - **traits**: the storage capability set (insert-with-id, update/delete
//!   with affected-row semantics, point/bulk queries, cascade deletes)
//! - **memory**: `MemoryStore`, a thread-safe implementation of every trait
//! - **id**: per-kind monotonically increasing id sequences

// Public modules
pub mod id;
pub mod memory;
pub mod traits;

// Re-export commonly used types for convenience
pub use id::IdSequence;
pub use memory::MemoryStore;
pub use traits::{
    FilmGenreStorage, FilmStorage, FriendStorage, GenreStorage, LikeStorage, RatingStorage,
    UserStorage,
};
