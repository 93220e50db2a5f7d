use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise a request piped on stdin.
/// Returns None when stdin is a terminal or carries no data.
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

    let value: T = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse request on stdin: {e}"))?;
    Ok(Some(value))
}
