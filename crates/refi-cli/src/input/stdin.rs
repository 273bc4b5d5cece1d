use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise piped stdin into `T`.
///
/// JSON is tried first so quoted numeric map keys keep working; anything
/// that is not JSON is parsed as YAML.
/// Returns None when stdin is interactive or carries nothing but whitespace.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: T = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(json_err) => serde_yaml::from_str(trimmed).map_err(|yaml_err| {
            format!(
                "Failed to parse stdin as JSON ({}) or YAML ({})",
                json_err, yaml_err
            )
        })?,
    };
    tracing::debug!(bytes = trimmed.len(), "loaded input from stdin");
    Ok(Some(value))
}
