//! Loading receiver geometry from JSON files.
//!
//! A receiver file holds an array with one object per receiver:
//!
//! ```json
//! [
//!     { "x": 0.0, "y": 0.0, "p0": -40.0, "L": 2.0 },
//!     { "x": 10.0, "y": 0.0, "p0": -40.0, "L": 2.0 },
//!     { "x": 0.0, "y": 10.0, "p0": -40.0, "L": 2.0 }
//! ]
//! ```

use crate::{
    error,
    receiver::{RawReceiver, Receiver, Receivers},
};
use std::{fs, io, path::Path};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read receiver file: {0}")]
    Io(#[from] io::Error),
    #[error("receiver file is empty")]
    Empty,
    #[error("receiver file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("receiver {index} is invalid: {source}")]
    Receiver { index: usize, source: error::Error },
    #[error(transparent)]
    Receivers(#[from] error::Error),
}

/// Read and validate the receivers described in the JSON file at `path`.
pub fn load_receivers(path: impl AsRef<Path>) -> Result<Receivers, ConfigError> {
    let serialized = fs::read_to_string(path.as_ref())?;
    let receivers = parse_receivers(&serialized)?;
    debug!(
        count = receivers.len(),
        path = %path.as_ref().display(),
        "loaded receivers"
    );
    Ok(receivers)
}

/// Parse and validate receivers from a JSON string.
pub fn parse_receivers(serialized: &str) -> Result<Receivers, ConfigError> {
    if serialized.trim().is_empty() {
        return Err(ConfigError::Empty);
    }

    // Parse leniently first so that errors can name the offending receiver.
    let raw: Vec<RawReceiver> = serde_json::from_str(serialized)?;
    let receivers = raw
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            Receiver::try_from(raw).map_err(|source| ConfigError::Receiver { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Receivers::new(receivers)?)
}
