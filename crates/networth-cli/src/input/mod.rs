pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Resolve a command's input: an explicit `--input` file wins, then piped
/// stdin, otherwise the caller's error message is surfaced.
pub fn resolve<T: DeserializeOwned>(
    path: Option<&str>,
    missing: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_json(path);
    }
    if let Some(value) = stdin::read_stdin()? {
        return Ok(serde_json::from_value(value)?);
    }
    Err(missing.into())
}
