use serde::{Deserialize, Deserializer};

// query values arrive as text; anything that does not parse falls back to the
// handler default instead of failing the whole request
pub fn deserialize_lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|value| value.parse::<u32>().ok()))
}
