use serde_json::Value;
use std::io::{self, Read};

/// Read a piped JSON document (usually deal assumptions) from stdin.
/// Interactive TTYs and empty pipes yield None so flag input takes over.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str(trimmed)?))
}
