//! User profile and session token, kept as opaque values in a key-value store.
//!
//! Credentials never pass through here: authentication belongs to the backend
//! and only the bearer token it hands out is stored.

use serde::{Deserialize, Serialize};

use crate::{errors::Result, storage::KeyValueStore};

pub const PROFILE_KEY: &str = "user_data";
pub const AUTH_TOKEN_KEY: &str = "auth_token";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub birthday: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_uri: Option<String>,
}

impl Profile {
    pub const FIELDS: [&'static str; 6] =
        ["name", "email", "phone", "address", "birthday", "image"];

    /// Sets a field by name. Returns false for unknown fields.
    pub fn set_field(&mut self, field: &str, value: &str) -> bool {
        let value = value.trim().to_string();
        match field.to_ascii_lowercase().as_str() {
            "name" => self.name = value,
            "email" => self.email = value,
            "phone" => self.phone = value,
            "address" => self.address = value,
            "birthday" => self.birthday = value,
            "image" | "profile_image_uri" => {
                self.profile_image_uri = (!value.is_empty()).then_some(value)
            }
            _ => return false,
        }
        true
    }

    /// Fills empty local fields from a backend user object.
    pub fn merge_remote(&mut self, remote: &Profile) {
        fill(&mut self.name, &remote.name);
        fill(&mut self.email, &remote.email);
        fill(&mut self.phone, &remote.phone);
        fill(&mut self.address, &remote.address);
        fill(&mut self.birthday, &remote.birthday);
        if self.profile_image_uri.is_none() {
            self.profile_image_uri = remote.profile_image_uri.clone();
        }
    }
}

fn fill(local: &mut String, remote: &str) {
    if local.trim().is_empty() && !remote.trim().is_empty() {
        *local = remote.to_string();
    }
}

/// Reads and writes the profile under [`PROFILE_KEY`].
pub struct ProfileStore<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> ProfileStore<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Missing or unreadable profiles load as empty so the UI can start fresh.
    pub fn load(&self) -> Result<Profile> {
        let Some(raw) = self.store.get(PROFILE_KEY)? else {
            return Ok(Profile::default());
        };
        match serde_json::from_str(&raw) {
            Ok(profile) => Ok(profile),
            Err(err) => {
                tracing::warn!(error = %err, "stored profile is unreadable; starting empty");
                Ok(Profile::default())
            }
        }
    }

    pub fn save(&self, profile: &Profile) -> Result<()> {
        let json = serde_json::to_string(profile)?;
        self.store.set(PROFILE_KEY, &json)
    }

    pub fn clear(&self) -> Result<bool> {
        self.store.remove(PROFILE_KEY)
    }
}

/// Holds the backend bearer token under [`AUTH_TOKEN_KEY`].
pub struct Session<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(AUTH_TOKEN_KEY)?
            .filter(|token| !token.trim().is_empty()))
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.token()?.is_some())
    }

    pub fn store_token(&self, token: &str) -> Result<()> {
        self.store.set(AUTH_TOKEN_KEY, token.trim())
    }

    pub fn authorization_header(&self) -> Result<Option<String>> {
        Ok(self.token()?.map(|token| format!("Bearer {token}")))
    }

    pub fn logout(&self) -> Result<bool> {
        self.store.remove(AUTH_TOKEN_KEY)
    }
}
