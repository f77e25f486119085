//! In-memory user store.
//!
//! One `parking_lot::Mutex` guards the whole collection and the id counter,
//! so every operation sees and leaves a consistent snapshot. Nothing awaits
//! while the lock is held.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::Utc;
use parking_lot::Mutex;
use regex::Regex;
use tracing::info;

use crate::error::ApiError;
use crate::model::{CreateUserRequest, Nested, Patch, Section, UpdateUserRequest, User};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Authoritative collection of users keyed by identifier.
///
/// Identifiers come from a counter that starts at 1 and only moves forward,
/// so an id is never handed out twice, even after its user is deleted. Since
/// ids increase with insertion, key order is insertion order.
#[derive(Debug, Default)]
pub struct Store {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<u64, User>,
    last_id: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All users, oldest first.
    pub fn list(&self) -> Vec<User> {
        self.inner.lock().users.values().cloned().collect()
    }

    pub fn get(&self, id: u64) -> Result<User, ApiError> {
        self.inner
            .lock()
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::user_not_found(id))
    }

    /// Validates `req` and stores a new user. A rejected request leaves the
    /// store and the id counter untouched.
    pub fn create(&self, req: CreateUserRequest) -> Result<User, ApiError> {
        validate_name(&req.name)?;
        validate_email(&req.email)?;

        let now = Utc::now();
        let mut inner = self.inner.lock();
        inner.last_id += 1;
        let user = User {
            id: inner.last_id,
            name: req.name,
            email: req.email,
            address: req.address,
            contact: req.contact,
            profile: req.profile,
            preferences: req.preferences,
            created_at: now,
            updated_at: now,
        };
        let previous = inner.users.insert(user.id, user.clone());
        debug_assert!(previous.is_none(), "user id {} issued twice", user.id);

        info!(id = user.id, "user created");
        Ok(user)
    }

    /// Applies `patch` to user `id`. Supplied sub-objects replace the old
    /// ones wholesale. An unknown id wins over an invalid patch, and the
    /// whole patch is checked before anything is written.
    pub fn update(&self, id: u64, patch: UpdateUserRequest) -> Result<User, ApiError> {
        let mut inner = self.inner.lock();
        let user = inner.users.get_mut(&id).ok_or_else(|| ApiError::user_not_found(id))?;
        validate_patch(&patch)?;

        apply(&mut user.name, patch.name);
        apply(&mut user.email, patch.email);
        apply(&mut user.address, patch.address);
        apply(&mut user.contact, patch.contact);
        apply(&mut user.profile, patch.profile);
        apply(&mut user.preferences, patch.preferences);
        user.updated_at = Utc::now();

        info!(id, "user updated");
        Ok(user.clone())
    }

    /// Removes user `id` and returns what was stored.
    pub fn delete(&self, id: u64) -> Result<User, ApiError> {
        let removed = self
            .inner
            .lock()
            .users
            .remove(&id)
            .ok_or_else(|| ApiError::user_not_found(id))?;
        info!(id, "user deleted");
        Ok(removed)
    }

    pub fn nested(&self, id: u64, section: Section) -> Result<Nested, ApiError> {
        let inner = self.inner.lock();
        let user = inner.users.get(&id).ok_or_else(|| ApiError::user_not_found(id))?;
        Ok(match section {
            Section::Address     => Nested::Address(user.address.clone()),
            Section::Profile     => Nested::Profile(user.profile.clone()),
            Section::Preferences => Nested::Preferences(user.preferences.clone()),
        })
    }

    /// Swaps one sub-object of user `id` for `value` and returns the new value.
    pub fn replace_nested(&self, id: u64, value: Nested) -> Result<Nested, ApiError> {
        let mut inner = self.inner.lock();
        let user = inner.users.get_mut(&id).ok_or_else(|| ApiError::user_not_found(id))?;
        let section = value.section();
        match value.clone() {
            Nested::Address(address)         => user.address = address,
            Nested::Profile(profile)         => user.profile = profile,
            Nested::Preferences(preferences) => user.preferences = preferences,
        }
        user.updated_at = Utc::now();

        info!(id, section = section.as_str(), "user section replaced");
        Ok(value)
    }
}

/// `Clear` resets to the default. Required fields never get here cleared.
fn apply<T: Default>(slot: &mut T, patch: Patch<T>) {
    match patch {
        Patch::Absent => {}
        Patch::Clear => *slot = T::default(),
        Patch::Set(value) => *slot = value,
    }
}

fn validate_patch(patch: &UpdateUserRequest) -> Result<(), ApiError> {
    if let Patch::Set(name) = &patch.name {
        validate_name(name)?;
    }
    if let Patch::Set(email) = &patch.email {
        validate_email(email)?;
    }
    if matches!(patch.name, Patch::Clear) {
        return Err(ApiError::validation("name cannot be cleared"));
    }
    if matches!(patch.email, Patch::Clear) {
        return Err(ApiError::validation("email cannot be cleared"));
    }
    if matches!(patch.address, Patch::Clear) {
        return Err(ApiError::validation("address cannot be cleared"));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::validation("name is required"));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() {
        return Err(ApiError::validation("email is required"));
    }
    if !EMAIL.is_match(email) {
        return Err(ApiError::validation(format!("invalid email address: {email}")));
    }
    Ok(())
}
