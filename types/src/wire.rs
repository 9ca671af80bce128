//! Serde helpers for the JSON wire shape.

use serde::{Deserialize, Deserializer};

/// `deserialize_with` for optional fields where a present `null` is a value.
///
/// Pair with `#[serde(default)]`: a missing key stays `None`, while
/// `"field": null` becomes `Some` of whatever `T` reads from `null`
/// (`Value::Null`, `None`, `()`). Without it serde folds both into `None`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
