//! TensorInfo Core - API and pipeline tensors-info synchronisation
//!
//! This crate keeps two independently evolved descriptions of a tensor
//! collection consistent: the one handed to inference API callers and the
//! one the pipeline engine works with.
//!
//! # Architecture
//!
//! - `tensor::dtype` translates element types through explicit tables
//! - `tensor::dimension` detects extended ranks and copies dimension arrays
//! - `tensor::extra` holds descriptors beyond the inline array
//! - `tensor::sync` composes the above into the three conversion entry points
//!
//! Conversion is in-memory and synchronous. Only tensor metadata is touched,
//! never tensor data.
//!
//! # Example
//!
//! ```
//! use tensorinfo_core::tensor::{
//!     copy_to_pipeline, create_from_pipeline, PipelineTensorInfo, PipelineTensorType,
//!     PipelineTensorsInfo, TensorType,
//! };
//!
//! let mut pipeline = PipelineTensorsInfo::new();
//! pipeline.push(PipelineTensorInfo::new(
//!     Some("input"),
//!     PipelineTensorType::Float32,
//!     &[3, 224, 224, 1],
//! ));
//!
//! let info = create_from_pipeline(Some(&pipeline))?;
//! assert_eq!(info.tensor_type(0)?, TensorType::Float32);
//! assert!(!info.is_extended());
//!
//! let shared = info.into_shared();
//! let mut back = PipelineTensorsInfo::new();
//! copy_to_pipeline(Some(&mut back), Some(&shared))?;
//! assert_eq!(back, pipeline);
//! # Ok::<(), tensorinfo_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod report;
pub mod tensor;

pub use error::{Error, ErrorKind, Result};
