//! Domain validation rules for users and films.
//!
//! Everything here is a pure check against a single record. Rules that
//! need storage (genre/rating existence) live in the service layer, which
//! runs these checks first so an invalid record never reaches the store.

use chrono::{Local, NaiveDate};

use crate::error::{CatalogError, Result};
use crate::types::{Film, User};

/// Maximum length of a film description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// The earliest acceptable release date: the first public film screening,
/// December 28th, 1895.
pub fn release_date_floor() -> NaiveDate {
    NaiveDate::from_ymd_opt(1895, 12, 28).expect("valid calendar date")
}

/// Check the user-level rules: email shape, login shape, birthday not in
/// the future.
pub fn validate_user(user: &User) -> Result<()> {
    if user.email.trim().is_empty() {
        return Err(CatalogError::validation("email", "must not be blank"));
    }
    if !user.email.contains('@') {
        return Err(CatalogError::validation("email", "must contain '@'"));
    }
    if user.login.trim().is_empty() {
        return Err(CatalogError::validation("login", "must not be blank"));
    }
    if user.login.chars().any(char::is_whitespace) {
        return Err(CatalogError::validation(
            "login",
            "must not contain whitespace",
        ));
    }
    if user.birthday > Local::now().date_naive() {
        return Err(CatalogError::validation(
            "birthday",
            "must not be in the future",
        ));
    }
    Ok(())
}

/// Replace a blank display name with the login.
///
/// Applied on both create and update, so a stored user always has a name.
pub fn fill_name_from_login(user: &mut User) {
    if user.name.trim().is_empty() {
        user.name = user.login.clone();
    }
}

/// Check the film-level rules: non-blank name, bounded description,
/// release-date floor, positive duration.
pub fn validate_film(film: &Film) -> Result<()> {
    if film.name.trim().is_empty() {
        return Err(CatalogError::validation("name", "must not be blank"));
    }
    if film.description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(CatalogError::validation(
            "description",
            format!("must be at most {MAX_DESCRIPTION_CHARS} characters"),
        ));
    }
    if film.release_date < release_date_floor() {
        return Err(CatalogError::validation(
            "release_date",
            format!("must not be earlier than {}", release_date_floor()),
        ));
    }
    if film.duration == 0 {
        return Err(CatalogError::validation("duration", "must be positive"));
    }
    Ok(())
}
