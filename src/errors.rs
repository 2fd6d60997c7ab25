//! Failure values reported by the layout engine.
//!
//! Every rejection is detected synchronously while a device is registered or
//! while the layout is finalized. Nothing is partially applied: the assembler
//! that produced an error refuses all further work (see [`LayoutError::Invalidated`]).

use std::fmt;

use thiserror::Error;

/// Why a binding was refused as the primary (signal) device.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimaryRejection {
    /// A primary device was already registered on this assembler.
    AlreadySet,
    /// The binding was declared with the axis role.
    NotPrimaryRole,
    /// The device has several fields and none (or more than one) is flagged as default.
    NoDefaultField,
}

impl fmt::Display for PrimaryRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrimaryRejection::AlreadySet => "a primary device is already set",
            PrimaryRejection::NotPrimaryRole => "binding does not have the primary role",
            PrimaryRejection::NoDefaultField => "device has no default field",
        };
        write!(f, "{}", s)
    }
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    #[error("no primary device has been set")]
    PrimaryNotSet,

    #[error("invalid primary device '{device}': {reason}")]
    InvalidPrimary { device: String, reason: PrimaryRejection },

    #[error("layout has already been built")]
    AlreadyBuilt,

    #[error("assembler was invalidated by an earlier failure")]
    Invalidated,

    #[error("device '{device}' is not bound with the axis role")]
    NotAnAxis { device: String },

    #[error("device '{device}' declares a default axis dimension but has no default field")]
    MissingDefaultField { device: String },

    #[error("cannot determine the signal dimensions of field '{field}'")]
    MissingIndexMapping { field: String },

    #[error("field '{field}' has rank {rank} but its index mapping is {indices:?}")]
    IndexRankMismatch { field: String, rank: usize, indices: Vec<usize> },

    #[error("field '{field}' references dimension {dimension} but the signal has rank {rank}")]
    DimensionOutOfRange { field: String, dimension: usize, rank: usize },

    #[error("field '{field}' maps signal dimension {dimension} more than once")]
    DuplicateIndex { field: String, dimension: usize },

    #[error("field '{field}' has extent {actual} where signal dimension {dimension} has extent {expected}")]
    ShapeMismatch { field: String, dimension: usize, expected: usize, actual: usize },

    #[error("default axis for dimension {dimension} is already '{existing}', cannot assign '{field}'")]
    DuplicateDefaultAxis { dimension: usize, existing: String, field: String },

    /// The field in default-axis slot `dimension` does not list `dimension`
    /// among its indices. NeXus requires a default axis to index its own
    /// dimension, so this is rejected even though each index is valid on its own.
    #[error("default axis '{field}' does not index signal dimension {dimension}")]
    DefaultAxisNotIndexed { field: String, dimension: usize },

    #[error("device '{device}' has no field '{field}'")]
    UnknownField { device: String, field: String },

    #[error("signal '{field}' must map its dimensions in order, found {indices:?}")]
    SignalIndicesNotIdentity { field: String, indices: Vec<usize> },

    #[error("field name '{name}' is already in use")]
    DuplicateFieldName { name: String },

    #[error("invalid shape {extents:?}: every extent must be at least 1")]
    InvalidShape { extents: Vec<usize> },
}

pub type LayoutResult<T> = Result<T, LayoutError>;

/// Failure while reading a configuration, scan description or stored layout.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "yaml")]
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported file format '{extension}'")]
    UnsupportedFormat { extension: String },

    #[error("unknown device '{name}'")]
    UnknownDevice { name: String },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}
