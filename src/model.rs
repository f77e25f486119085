//! User record and its nested value objects, plus the request payloads that
//! create and patch it.
//!
//! These types carry no behavior. Wire mapping lives in
//! [`render`](crate::render); validation lives in [`store`](crate::store).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// A user with its exclusively owned sub-objects.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub address: Address,
    pub contact: ContactInfo,
    pub profile: Profile,
    pub preferences: Preferences,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(deserialize_with = "null_as_default")]
    pub street: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub postal_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    pub alternate_email: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub bio: Option<String>,
    pub avatar: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Preferences {
    #[serde(deserialize_with = "null_as_default")]
    pub theme: String,
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub notifications: NotificationSettings,
    #[serde(deserialize_with = "null_as_default")]
    pub privacy: PrivacySettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    #[serde(deserialize_with = "null_as_default")]
    pub email: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub sms: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub push: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub marketing: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PrivacySettings {
    #[serde(deserialize_with = "null_as_default")]
    pub profile_visible: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub show_email: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub show_phone: bool,
}

/// Body of `POST /users`. `name`, `email` and `address` must be present;
/// the other sections may be missing or `null`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub address: Address,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact: ContactInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile: Profile,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preferences: Preferences,
}

/// Decodes an explicit `null` as the type's default. Paired with
/// `#[serde(default)]` so a missing key and `null` read the same.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `PUT /users/{id}`. Every field is optional; see [`Patch`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub name: Patch<String>,
    pub email: Patch<String>,
    pub address: Patch<Address>,
    pub contact: Patch<ContactInfo>,
    pub profile: Patch<Profile>,
    pub preferences: Patch<Preferences>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_absent()
            && self.email.is_absent()
            && self.address.is_absent()
            && self.contact.is_absent()
            && self.profile.is_absent()
            && self.preferences.is_absent()
    }
}

/// One field of a partial update.
///
/// A missing key decodes as `Absent` (via `#[serde(default)]` on the
/// containing struct), an explicit `null` as `Clear`, anything else as
/// `Set`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Self::Set(value),
            None => Self::Clear,
        })
    }
}

/// The sub-objects that can be read and replaced on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Address,
    Profile,
    Preferences,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Address     => "address",
            Self::Profile     => "profile",
            Self::Preferences => "preferences",
        }
    }
}

/// The value of one [`Section`].
#[derive(Debug, Clone, PartialEq)]
pub enum Nested {
    Address(Address),
    Profile(Profile),
    Preferences(Preferences),
}

impl Nested {
    pub fn section(&self) -> Section {
        match self {
            Self::Address(_)     => Section::Address,
            Self::Profile(_)     => Section::Profile,
            Self::Preferences(_) => Section::Preferences,
        }
    }

    /// Decodes a JSON body as the given section's value.
    pub fn from_json(section: Section, body: &[u8]) -> serde_json::Result<Self> {
        Ok(match section {
            Section::Address     => Self::Address(serde_json::from_slice(body)?),
            Section::Profile     => Self::Profile(serde_json::from_slice(body)?),
            Section::Preferences => Self::Preferences(serde_json::from_slice(body)?),
        })
    }
}
