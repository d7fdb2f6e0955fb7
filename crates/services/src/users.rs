//! User service: entity lifecycle plus the friendship graph.
//!
//! Every operation checks existence and uniqueness invariants before it
//! touches storage, so an invalid request never leaves a partial write
//! behind. Friendship edges are directed: adding `a -> b` says nothing
//! about `b -> a`.

use std::sync::Arc;

use tracing::{debug, info, warn};

use catalog::{CatalogError, FriendshipStatus, Result, User, UserId, validation};
use storage::{FriendStorage, UserStorage};

/// Business rules for users and their friendships.
pub struct UserService<S> {
    store: Arc<S>,
}

impl<S> UserService<S>
where
    S: UserStorage + FriendStorage,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a new user. A blank display name is replaced by the login
    /// before the record is stored.
    pub fn create(&self, mut user: User) -> Result<User> {
        info!(login = %user.login, "creating user");
        validation::validate_user(&user)?;
        validation::fill_name_from_login(&mut user);

        let created = self.store.insert_user(user);
        debug!(user_id = created.id, "user created");
        Ok(created)
    }

    /// Update an existing user. Fails with NotFound when the id is absent;
    /// update is never an implicit insert. The name-from-login fill applies
    /// here too.
    pub fn update(&self, mut user: User) -> Result<User> {
        info!(user_id = user.id, "updating user");
        validation::validate_user(&user)?;
        validation::fill_name_from_login(&mut user);

        if !self.store.update_user(&user) {
            return Err(CatalogError::not_found("user", user.id));
        }
        debug!(user_id = user.id, "user updated");
        Ok(user)
    }

    pub fn get_all(&self) -> Vec<User> {
        self.store.all_users()
    }

    pub fn get_by_id(&self, id: UserId) -> Result<User> {
        self.store
            .find_user(id)
            .ok_or_else(|| CatalogError::not_found("user", id))
    }

    /// Delete a user. The row delete and the cleanup of every like and
    /// friendship edge referencing the user happen in one unit of work.
    pub fn delete(&self, id: UserId) -> Result<()> {
        info!(user_id = id, "deleting user");
        if !self.store.delete_user(id) {
            return Err(CatalogError::not_found("user", id));
        }
        Ok(())
    }

    /// Add a directed friendship edge. The self-edge check runs before
    /// anything else, so a self-add never reaches storage. The default
    /// path writes the edge as Confirmed.
    pub fn add_friend(&self, user_id: UserId, friend_id: UserId) -> Result<()> {
        info!(user_id, friend_id, "adding friend");

        if user_id == friend_id {
            return Err(CatalogError::validation(
                "friend_id",
                "a user cannot befriend themselves",
            ));
        }
        self.require_user(user_id)?;
        self.require_user(friend_id)?;

        if self.store.friendship_exists(user_id, friend_id) {
            warn!(user_id, friend_id, "friendship already exists");
            return Err(CatalogError::conflict(format!(
                "users {user_id} and {friend_id} are already friends"
            )));
        }

        self.store
            .add_friendship(user_id, friend_id, FriendshipStatus::Confirmed);
        Ok(())
    }

    /// Remove a directed friendship edge. Removing an absent edge is a
    /// no-op, but both users must exist.
    pub fn remove_friend(&self, user_id: UserId, friend_id: UserId) -> Result<()> {
        info!(user_id, friend_id, "removing friend");
        self.require_user(user_id)?;
        self.require_user(friend_id)?;

        self.store.remove_friendship(user_id, friend_id);
        Ok(())
    }

    /// Change the status of an existing edge (e.g. a pending request being
    /// confirmed).
    pub fn set_friendship_status(
        &self,
        user_id: UserId,
        friend_id: UserId,
        status: FriendshipStatus,
    ) -> Result<()> {
        info!(user_id, friend_id, ?status, "updating friendship status");
        self.require_user(user_id)?;
        self.require_user(friend_id)?;

        if !self.store.update_friendship_status(user_id, friend_id, status) {
            return Err(CatalogError::conflict(format!(
                "users {user_id} and {friend_id} are not friends"
            )));
        }
        Ok(())
    }

    /// Full user records for everyone `user_id` points at, ascending by id.
    pub fn get_friends(&self, user_id: UserId) -> Result<Vec<User>> {
        info!(user_id, "listing friends");
        self.require_user(user_id)?;

        let mut ids: Vec<UserId> = self.store.friend_ids(user_id).into_iter().collect();
        ids.sort_unstable();
        let friends = self.store.find_users(&ids);
        debug!(user_id, count = friends.len(), "friends found");
        Ok(friends)
    }

    /// Users both `user_id` and `other_id` point at, ascending by id.
    /// Symmetric in its arguments.
    pub fn get_common_friends(&self, user_id: UserId, other_id: UserId) -> Result<Vec<User>> {
        info!(user_id, other_id, "listing common friends");
        self.require_user(user_id)?;
        self.require_user(other_id)?;

        let mut ids: Vec<UserId> = self
            .store
            .common_friend_ids(user_id, other_id)
            .into_iter()
            .collect();
        ids.sort_unstable();
        Ok(self.store.find_users(&ids))
    }

    fn require_user(&self, id: UserId) -> Result<()> {
        if self.store.user_exists(id) {
            Ok(())
        } else {
            Err(CatalogError::not_found("user", id))
        }
    }
}
