//! Element types on both sides of the bridge
//!
//! The API-facing [`TensorType`] and the pipeline-facing
//! [`PipelineTensorType`] are declared independently. Their ordinals agree
//! today, but conversion goes through explicit tables so that a member added
//! to only one side cannot silently shift the mapping.

use serde::{Deserialize, Serialize};

use crate::report_error;
use crate::Error;

/// Element type of a tensor as seen by API callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorType {
    /// 32-bit signed integer
    Int32,
    /// 32-bit unsigned integer
    UInt32,
    /// 16-bit signed integer
    Int16,
    /// 16-bit unsigned integer
    UInt16,
    /// 8-bit signed integer
    Int8,
    /// 8-bit unsigned integer
    UInt8,
    /// 64-bit floating point
    Float64,
    /// 32-bit floating point
    Float32,
    /// 64-bit signed integer
    Int64,
    /// 64-bit unsigned integer
    UInt64,
    /// 16-bit floating point
    Float16,
    /// Invalid or not yet set
    #[default]
    Unknown,
}

/// Element type of a tensor as seen by the pipeline engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PipelineTensorType {
    /// `int32`
    Int32,
    /// `uint32`
    UInt32,
    /// `int16`
    Int16,
    /// `uint16`
    UInt16,
    /// `int8`
    Int8,
    /// `uint8`
    UInt8,
    /// `float64`
    Float64,
    /// `float32`
    Float32,
    /// `int64`
    Int64,
    /// `uint64`
    UInt64,
    /// `float16`
    Float16,
    /// End of the enumeration, doubles as the invalid value
    #[default]
    End,
}

const API_TYPES: [TensorType; 11] = [
    TensorType::Int32,
    TensorType::UInt32,
    TensorType::Int16,
    TensorType::UInt16,
    TensorType::Int8,
    TensorType::UInt8,
    TensorType::Float64,
    TensorType::Float32,
    TensorType::Int64,
    TensorType::UInt64,
    TensorType::Float16,
];

const PIPELINE_TYPES: [PipelineTensorType; 11] = [
    PipelineTensorType::Int32,
    PipelineTensorType::UInt32,
    PipelineTensorType::Int16,
    PipelineTensorType::UInt16,
    PipelineTensorType::Int8,
    PipelineTensorType::UInt8,
    PipelineTensorType::Float64,
    PipelineTensorType::Float32,
    PipelineTensorType::Int64,
    PipelineTensorType::UInt64,
    PipelineTensorType::Float16,
];

impl TensorType {
    /// Decode an ordinal, anything outside the defined range is `Unknown`
    pub fn from_code(code: i32) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|i| API_TYPES.get(i).copied())
            .unwrap_or(TensorType::Unknown)
    }

    /// Ordinal of this type
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Whether this is a real element type rather than the sentinel
    pub fn is_valid(&self) -> bool {
        *self != TensorType::Unknown
    }

    /// Size of one element in bytes, 0 for `Unknown`
    pub fn element_size(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 | Self::Float16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
            Self::Unknown => 0,
        }
    }

    /// Lowercase name used in pipeline descriptions
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Float64 => "float64",
            Self::Float32 => "float32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float16 => "float16",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TensorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TensorType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        API_TYPES
            .iter()
            .copied()
            .find(|ty| ty.as_str() == name)
            .ok_or_else(|| Error::InvalidType(format!("unknown tensor type name '{}'", s)))
    }
}

impl PipelineTensorType {
    /// Decode an ordinal, anything outside the defined range is `End`
    pub fn from_code(code: i32) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|i| PIPELINE_TYPES.get(i).copied())
            .unwrap_or(PipelineTensorType::End)
    }

    /// Ordinal of this type
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

/// Translate a pipeline type into the API enumeration
///
/// `End` (or anything decoded from an out-of-range code) is reported and
/// mapped to [`TensorType::Unknown`]; conversion of the surrounding
/// collection carries on.
pub fn to_api_type(ty: PipelineTensorType) -> TensorType {
    match ty {
        PipelineTensorType::Int32 => TensorType::Int32,
        PipelineTensorType::UInt32 => TensorType::UInt32,
        PipelineTensorType::Int16 => TensorType::Int16,
        PipelineTensorType::UInt16 => TensorType::UInt16,
        PipelineTensorType::Int8 => TensorType::Int8,
        PipelineTensorType::UInt8 => TensorType::UInt8,
        PipelineTensorType::Float64 => TensorType::Float64,
        PipelineTensorType::Float32 => TensorType::Float32,
        PipelineTensorType::Int64 => TensorType::Int64,
        PipelineTensorType::UInt64 => TensorType::UInt64,
        PipelineTensorType::Float16 => TensorType::Float16,
        PipelineTensorType::End => {
            report_error!(
                "Failed to convert the type. Input pipeline tensor type {} is invalid.",
                ty.code()
            );
            TensorType::Unknown
        }
    }
}

/// Translate an API type into the pipeline enumeration
///
/// `Unknown` is reported and mapped to [`PipelineTensorType::End`].
pub fn to_pipeline_type(ty: TensorType) -> PipelineTensorType {
    match ty {
        TensorType::Int32 => PipelineTensorType::Int32,
        TensorType::UInt32 => PipelineTensorType::UInt32,
        TensorType::Int16 => PipelineTensorType::Int16,
        TensorType::UInt16 => PipelineTensorType::UInt16,
        TensorType::Int8 => PipelineTensorType::Int8,
        TensorType::UInt8 => PipelineTensorType::UInt8,
        TensorType::Float64 => PipelineTensorType::Float64,
        TensorType::Float32 => PipelineTensorType::Float32,
        TensorType::Int64 => PipelineTensorType::Int64,
        TensorType::UInt64 => PipelineTensorType::UInt64,
        TensorType::Float16 => PipelineTensorType::Float16,
        TensorType::Unknown => {
            report_error!(
                "Failed to convert the type. Input tensor type {} is invalid.",
                ty.code()
            );
            PipelineTensorType::End
        }
    }
}
