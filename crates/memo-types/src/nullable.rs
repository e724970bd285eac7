use serde::{Deserialize, Deserializer};

/// Deserialize a list that may have been stored as JSON `null`.
///
/// Lists written by the first version of the server encode an empty list as
/// `null`; those read back as empty.
pub(crate) fn vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
