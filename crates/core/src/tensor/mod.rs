//! Tensors-info metadata on both sides of the bridge
//!
//! The API side ([`TensorsInfo`]) and the pipeline side
//! ([`PipelineTensorsInfo`]) both describe an ordered collection of tensors
//! with a name, an element type and a shape. They disagree on the rank they
//! support and on where descriptors beyond the inline array are kept;
//! [`sync`] converts between them.

pub mod dimension;
pub mod dtype;
pub mod extra;
pub mod info;
pub mod lock;
pub mod pipeline;
pub mod sync;

pub use dtype::{to_api_type, to_pipeline_type, PipelineTensorType, TensorType};
pub use extra::ExtraInfo;
pub use info::{InfoForm, TensorInfo, TensorsInfo};
pub use lock::{Lockable, NoLock};
pub use pipeline::{PipelineTensorInfo, PipelineTensorsInfo};
pub use sync::{copy_from_pipeline, copy_to_pipeline, create_from_pipeline};

/// Rank supported by standard (non-extended) API collections
pub const LEGACY_RANK_LIMIT: usize = 4;

/// Rank supported by extended API collections
pub const RANK_LIMIT: usize = 16;

/// Rank supported by the pipeline engine
pub const PIPELINE_RANK_LIMIT: usize = 16;

/// Maximum number of tensors in a collection
pub const SIZE_LIMIT: usize = 256;

/// Number of descriptors kept inline before the extra store is needed
pub const SIZE_LIMIT_STATIC: usize = 16;
