//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` + `Validate` update DTO (all `Option` fields) for patches
//!
//! Nullable columns in update DTOs use `Option<Option<T>>`: an absent field
//! keeps the stored value, an explicit `null` clears it.

use serde::{Deserialize, Deserializer};

pub mod bookmark;
pub mod experience;
pub mod notification;
pub mod project;

/// Deserialize a present field (including `null`) as `Some`, so that
/// `#[serde(default)]` leaves absent fields as `None`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
