//! Pipeline-side tensors info
//!
//! This is the representation the pipeline engine owns. Dimension storage is
//! a fixed `[u32; PIPELINE_RANK_LIMIT]` and the collection carries no
//! extended flag; whether it exceeds the legacy rank is always derived.
//! A collection may be built for an older engine that only understands
//! [`LEGACY_RANK_LIMIT`](crate::tensor::LEGACY_RANK_LIMIT) dimensions, see
//! [`PipelineTensorsInfo::with_rank_limit`].

use crate::report_error;
use crate::tensor::dimension::{clear_extended_ranks, copy_dimensions};
use crate::tensor::dtype::PipelineTensorType;
use crate::tensor::extra::ExtraInfo;
use crate::tensor::{PIPELINE_RANK_LIMIT, SIZE_LIMIT_STATIC};

/// One tensor as described by the pipeline engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineTensorInfo {
    /// Optional tensor name
    pub name: Option<String>,
    /// Element type
    pub tensor_type: PipelineTensorType,
    /// Dimensions, innermost first, unused positions zero
    pub dimension: [u32; PIPELINE_RANK_LIMIT],
}

impl Default for PipelineTensorInfo {
    fn default() -> Self {
        Self {
            name: None,
            tensor_type: PipelineTensorType::End,
            dimension: [0; PIPELINE_RANK_LIMIT],
        }
    }
}

impl PipelineTensorInfo {
    /// Build a descriptor, `dims` is zero-padded (or truncated) to the
    /// pipeline rank limit
    pub fn new(name: Option<&str>, tensor_type: PipelineTensorType, dims: &[u32]) -> Self {
        let mut dimension = [0; PIPELINE_RANK_LIMIT];
        copy_dimensions(dims, &mut dimension);
        Self {
            name: name.map(str::to_owned),
            tensor_type,
            dimension,
        }
    }
}

/// Collection of tensor descriptors owned by the pipeline engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineTensorsInfo {
    /// Number of valid descriptors
    pub num_tensors: usize,
    rank_limit: usize,
    info: [PipelineTensorInfo; SIZE_LIMIT_STATIC],
    extra: Option<ExtraInfo<PipelineTensorInfo>>,
}

impl Default for PipelineTensorsInfo {
    fn default() -> Self {
        Self {
            num_tensors: 0,
            rank_limit: PIPELINE_RANK_LIMIT,
            info: Default::default(),
            extra: None,
        }
    }
}

impl PipelineTensorsInfo {
    /// Create an empty collection with the full pipeline rank limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collection that holds at most `rank_limit` dimensions
    /// per tensor
    ///
    /// The limit is clamped to `1..=PIPELINE_RANK_LIMIT`.
    pub fn with_rank_limit(rank_limit: usize) -> Self {
        Self {
            rank_limit: rank_limit.clamp(1, PIPELINE_RANK_LIMIT),
            ..Self::default()
        }
    }

    /// Number of dimensions each descriptor can hold
    pub fn rank_limit(&self) -> usize {
        self.rank_limit
    }

    /// Reset to an empty collection, dropping any extra storage
    ///
    /// The rank limit is kept.
    pub fn init(&mut self) {
        self.num_tensors = 0;
        self.info
            .iter_mut()
            .for_each(|info| *info = PipelineTensorInfo::default());
        self.extra = None;
    }

    /// Whether descriptors beyond the inline array have storage
    pub fn has_extra(&self) -> bool {
        self.extra.is_some()
    }

    /// Descriptor at `index`
    ///
    /// Returns `None` past the inline array when no extra storage exists,
    /// or when `index` is beyond the size limit.
    pub fn nth_info(&self, index: usize) -> Option<&PipelineTensorInfo> {
        if index < SIZE_LIMIT_STATIC {
            return self.info.get(index);
        }
        self.extra.as_ref().and_then(|extra| extra.get(index))
    }

    /// Mutable descriptor at `index`, creating extra storage when needed
    pub fn nth_info_mut(&mut self, index: usize) -> Option<&mut PipelineTensorInfo> {
        if index < SIZE_LIMIT_STATIC {
            return self.info.get_mut(index);
        }
        match ExtraInfo::ensure(&mut self.extra) {
            Ok(extra) => extra.get_mut(index),
            Err(e) => {
                report_error!("Failed to allocate extra tensors info for index {}: {}", index, e);
                None
            }
        }
    }

    /// Append a descriptor, returning its index
    ///
    /// Dimensions past the rank limit are dropped. Returns `None` when the
    /// collection is full.
    pub fn push(&mut self, mut info: PipelineTensorInfo) -> Option<usize> {
        let index = self.num_tensors;
        clear_extended_ranks(&mut info.dimension, self.rank_limit);
        let slot = self.nth_info_mut(index)?;
        *slot = info;
        self.num_tensors += 1;
        Some(index)
    }

    /// Descriptors `0..num_tensors` that can be resolved
    pub fn iter(&self) -> impl Iterator<Item = &PipelineTensorInfo> {
        (0..self.num_tensors).map_while(move |i| self.nth_info(i))
    }
}
