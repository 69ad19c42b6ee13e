use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_chase_core::{MazeDimensions, MazeLayout};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "maze";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
const SNAPSHOT_HEADER: &str = "maze:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

#[derive(Serialize)]
struct EncodedWalls<'a> {
    horizontal: &'a [bool],
    vertical: &'a [bool],
}

#[derive(Deserialize)]
struct DecodedWalls {
    horizontal: Vec<bool>,
    vertical: Vec<bool>,
}

/// Encodes a maze layout into a single-line string suitable for sharing.
pub(crate) fn encode(layout: &MazeLayout) -> Result<String, LayoutTransferError> {
    let payload = EncodedWalls {
        horizontal: &layout.horizontal,
        vertical: &layout.vertical,
    };
    let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::Serialize)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
        layout.dimensions.columns(),
        layout.dimensions.rows()
    ))
}

/// Decodes and validates a maze layout from its string representation.
pub(crate) fn decode(value: &str) -> Result<MazeLayout, LayoutTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LayoutTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

    if domain != SNAPSHOT_DOMAIN {
        return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != SNAPSHOT_VERSION {
        return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
    }

    let dimensions = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LayoutTransferError::InvalidEncoding)?;
    let walls: DecodedWalls =
        serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

    let layout = MazeLayout {
        dimensions,
        horizontal: walls.horizontal,
        vertical: walls.vertical,
    };
    layout.validate()?;
    Ok(layout)
}

/// Errors that can occur while encoding or decoding layout transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout string was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded layout.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The encoded layout did not contain a version segment.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The encoded layout did not include grid dimensions.
    #[error("layout string is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded layout did not include the payload segment.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The encoded layout used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded layout used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded layout.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The wall matrices were rejected.
    #[error("layout walls are invalid: {0}")]
    InvalidLayout(#[from] maze_chase_core::LayoutError),
    /// The wall matrices could not be serialised.
    #[error("could not serialise layout: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<MazeDimensions, LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    MazeDimensions::new(columns, rows).map_err(|_| invalid())
}
