//! API-side tensors info
//!
//! [`TensorsInfo`] is what API callers create, fill in and read back. A
//! collection is built in one of two forms: standard collections expose
//! [`LEGACY_RANK_LIMIT`] dimensions per tensor, extended ones expose
//! [`RANK_LIMIT`]. The form is chosen at construction and never downgraded.
//!
//! # Example
//! ```
//! use tensorinfo_core::tensor::{TensorType, TensorsInfo};
//!
//! let mut info = TensorsInfo::new().unwrap();
//! info.set_count(1).unwrap();
//! info.set_tensor_type(0, TensorType::Float32).unwrap();
//! info.set_tensor_dimension(0, &[3, 224, 224, 1]).unwrap();
//!
//! assert!(info.validate());
//! assert_eq!(info.tensor_size(Some(0)).unwrap(), 3 * 224 * 224 * 4);
//! ```

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::report::invalid_parameter;
use crate::tensor::dimension::{copy_dimensions, element_count, rank};
use crate::tensor::dtype::TensorType;
use crate::tensor::extra::ExtraInfo;
use crate::tensor::lock::NoLock;
use crate::tensor::{LEGACY_RANK_LIMIT, RANK_LIMIT, SIZE_LIMIT, SIZE_LIMIT_STATIC};
use crate::Result;

/// Which constructor a collection was built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfoForm {
    /// Legacy rank limit, extra storage created on demand
    #[default]
    Standard,
    /// Extended rank limit, extra storage created up front
    Extended,
}

impl std::fmt::Display for InfoForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InfoForm::Standard => write!(f, "standard"),
            InfoForm::Extended => write!(f, "extended"),
        }
    }
}

/// One tensor as described to API callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorInfo {
    pub(crate) name: Option<String>,
    pub(crate) tensor_type: TensorType,
    pub(crate) dimension: Vec<u32>,
}

impl Default for TensorInfo {
    fn default() -> Self {
        Self {
            name: None,
            tensor_type: TensorType::Unknown,
            dimension: vec![0; RANK_LIMIT],
        }
    }
}

impl TensorInfo {
    /// Tensor name, `None` when unset
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Element type
    pub fn tensor_type(&self) -> TensorType {
        self.tensor_type
    }

    /// Full dimension storage (`RANK_LIMIT` values)
    pub fn dimension(&self) -> &[u32] {
        &self.dimension
    }

    /// Size in bytes of a tensor with this type and shape, `None` on overflow
    pub fn size_bytes(&self) -> Option<usize> {
        element_count(&self.dimension)?.checked_mul(self.tensor_type.element_size())
    }
}

/// Collection of tensor descriptors exposed to API callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorsInfo {
    pub(crate) num_tensors: usize,
    pub(crate) is_extended: bool,
    form: InfoForm,
    info: Vec<TensorInfo>,
    pub(crate) extra: Option<ExtraInfo<TensorInfo>>,
}

impl TensorsInfo {
    /// Create an empty standard collection
    pub fn new() -> Result<Self> {
        Self::with_form(InfoForm::Standard)
    }

    /// Create an empty extended collection
    pub fn new_extended() -> Result<Self> {
        Self::with_form(InfoForm::Extended)
    }

    /// Create an empty collection of the given form
    pub fn with_form(form: InfoForm) -> Result<Self> {
        let mut info = Vec::new();
        info.try_reserve_exact(SIZE_LIMIT_STATIC)?;
        info.resize_with(SIZE_LIMIT_STATIC, TensorInfo::default);

        let extra = match form {
            InfoForm::Extended => Some(ExtraInfo::try_new()?),
            InfoForm::Standard => None,
        };

        Ok(Self {
            num_tensors: 0,
            is_extended: form == InfoForm::Extended,
            form,
            info,
            extra,
        })
    }

    /// Wrap in a mutex for sharing between threads
    pub fn into_shared(self) -> Mutex<Self> {
        Mutex::new(self)
    }

    /// Wrap for single-owner use without locking
    pub fn into_nolock(self) -> NoLock<Self> {
        NoLock::new(self)
    }

    /// Form chosen at construction
    pub fn form(&self) -> InfoForm {
        self.form
    }

    /// Whether dimensions beyond the legacy rank limit are in use
    pub fn is_extended(&self) -> bool {
        self.is_extended
    }

    /// Number of dimensions exposed per tensor
    ///
    /// Extended collections, by form or by flag, expose [`RANK_LIMIT`].
    pub fn rank_limit(&self) -> usize {
        if self.form == InfoForm::Extended || self.is_extended {
            RANK_LIMIT
        } else {
            LEGACY_RANK_LIMIT
        }
    }

    /// Number of tensors
    pub fn count(&self) -> usize {
        self.num_tensors
    }

    /// Set the number of tensors
    pub fn set_count(&mut self, count: usize) -> Result<()> {
        if count > SIZE_LIMIT {
            return Err(invalid_parameter(format!(
                "The parameter, count, is {}. It should not exceed {}.",
                count, SIZE_LIMIT
            )));
        }
        if count > SIZE_LIMIT_STATIC {
            self.create_extra()?;
        }
        self.num_tensors = count;
        Ok(())
    }

    /// Whether the extra store has been created
    pub fn has_extra(&self) -> bool {
        self.extra.is_some()
    }

    /// Extra store, if created
    pub fn extra(&self) -> Option<&ExtraInfo<TensorInfo>> {
        self.extra.as_ref()
    }

    /// Create the extra store, a no-op when it already exists
    pub fn create_extra(&mut self) -> Result<()> {
        ExtraInfo::ensure(&mut self.extra).map(|_| ())
    }

    /// Descriptor at `index`, regardless of the current count
    ///
    /// Returns `None` past the inline array when the extra store is absent,
    /// or when `index` is beyond the size limit.
    pub fn nth_info(&self, index: usize) -> Option<&TensorInfo> {
        if index < SIZE_LIMIT_STATIC {
            return self.info.get(index);
        }
        self.extra.as_ref().and_then(|extra| extra.get(index))
    }

    /// Mutable descriptor at `index`, same resolution rules as
    /// [`nth_info`](Self::nth_info)
    pub fn nth_info_mut(&mut self, index: usize) -> Option<&mut TensorInfo> {
        if index < SIZE_LIMIT_STATIC {
            return self.info.get_mut(index);
        }
        self.extra.as_mut().and_then(|extra| extra.get_mut(index))
    }

    /// Tensors `0..count()` that can be resolved
    pub fn iter(&self) -> impl Iterator<Item = &TensorInfo> {
        (0..self.num_tensors).map_while(move |i| self.nth_info(i))
    }

    fn checked(&self, index: usize) -> Result<&TensorInfo> {
        if index >= self.num_tensors {
            return Err(invalid_parameter(format!(
                "The parameter, index, is {}. It should be less than the number of tensors, {}.",
                index, self.num_tensors
            )));
        }
        self.nth_info(index).ok_or_else(|| {
            invalid_parameter(format!(
                "The tensors info cannot resolve tensor {}. This is probably an internal bug.",
                index
            ))
        })
    }

    fn checked_mut(&mut self, index: usize) -> Result<&mut TensorInfo> {
        self.checked(index)?;
        self.nth_info_mut(index).ok_or_else(|| {
            invalid_parameter(format!(
                "The tensors info cannot resolve tensor {}. This is probably an internal bug.",
                index
            ))
        })
    }

    /// Name of tensor `index`
    pub fn tensor_name(&self, index: usize) -> Result<Option<&str>> {
        Ok(self.checked(index)?.name())
    }

    /// Set or clear the name of tensor `index`
    pub fn set_tensor_name(&mut self, index: usize, name: Option<&str>) -> Result<()> {
        self.checked_mut(index)?.name = name.map(str::to_owned);
        Ok(())
    }

    /// Element type of tensor `index`
    pub fn tensor_type(&self, index: usize) -> Result<TensorType> {
        Ok(self.checked(index)?.tensor_type)
    }

    /// Set the element type of tensor `index`
    pub fn set_tensor_type(&mut self, index: usize, tensor_type: TensorType) -> Result<()> {
        if !tensor_type.is_valid() {
            return Err(invalid_parameter(format!(
                "The parameter, type, is {}. It should be a valid tensor type.",
                tensor_type
            )));
        }
        self.checked_mut(index)?.tensor_type = tensor_type;
        Ok(())
    }

    /// Dimensions of tensor `index`, [`rank_limit`](Self::rank_limit) values
    pub fn tensor_dimension(&self, index: usize) -> Result<&[u32]> {
        let limit = self.rank_limit();
        Ok(&self.checked(index)?.dimension[..limit])
    }

    /// Set the dimensions of tensor `index`
    ///
    /// Values past the rank limit of the collection must be zero. Missing
    /// trailing values are stored as zero.
    pub fn set_tensor_dimension(&mut self, index: usize, dims: &[u32]) -> Result<()> {
        let limit = self.rank_limit();
        if let Some(pos) = dims.iter().skip(limit).position(|&d| d > 0) {
            return Err(invalid_parameter(format!(
                "The dimension at index {} is non-zero, but the rank limit of this tensors info is {}. Create it with the extended form to use higher ranks.",
                limit + pos,
                limit
            )));
        }
        let info = self.checked_mut(index)?;
        copy_dimensions(dims, &mut info.dimension);
        Ok(())
    }

    /// Whether every tensor has a valid type and a non-empty shape
    pub fn validate(&self) -> bool {
        self.num_tensors > 0
            && self.iter().count() == self.num_tensors
            && self
                .iter()
                .all(|t| t.tensor_type.is_valid() && rank(&t.dimension) > 0)
    }

    /// Size in bytes of tensor `index`, or of all tensors for `None`
    ///
    /// A size that does not fit in `usize` is an `InvalidParameter`.
    pub fn tensor_size(&self, index: Option<usize>) -> Result<usize> {
        match index {
            Some(index) => self.size_of(index),
            None => (0..self.num_tensors).try_fold(0usize, |total, i| {
                let size = self.size_of(i)?;
                total.checked_add(size).ok_or_else(|| {
                    invalid_parameter(format!(
                        "The total size of the tensors info overflows at tensor {}.",
                        i
                    ))
                })
            }),
        }
    }

    fn size_of(&self, index: usize) -> Result<usize> {
        self.checked(index)?.size_bytes().ok_or_else(|| {
            invalid_parameter(format!(
                "The size of tensor {} overflows. Its dimensions are too large.",
                index
            ))
        })
    }

    /// Reset to an empty collection of the same form
    ///
    /// The extended flag is cleared. The extra store, if any, is kept and
    /// cleared.
    pub fn reset(&mut self) {
        self.num_tensors = 0;
        self.is_extended = false;
        self.info
            .iter_mut()
            .for_each(|info| *info = TensorInfo::default());
        if let Some(extra) = self.extra.as_mut() {
            extra.reset();
        }
    }
}
