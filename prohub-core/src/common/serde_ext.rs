//! Deserializers for rows coming out of PostgREST, where nullable columns
//! arrive as explicit `null` and ids may be text or integers.

use serde::{Deserialize, Deserializer};

/// Accepts ids stored either as text (uuid) or as integers.
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// `null` reads as the type's default. Pair with `#[serde(default)]` to
/// cover a missing key as well.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
