//! Dimension arrays and rank migration
//!
//! A dimension array is a fixed-capacity slice of `u32` whose length is the
//! capacity of the representation it belongs to. Index 0 is the innermost
//! axis and unused trailing positions are zero.

use crate::report::invalid_parameter;
use crate::Result;

/// Whether any array holds a non-zero value at or beyond `legacy_limit`
///
/// This is a collection-level property: one extended tensor makes the whole
/// collection extended.
pub fn is_extended<'a, I>(dimensions: I, legacy_limit: usize) -> bool
where
    I: IntoIterator<Item = &'a [u32]>,
{
    dimensions
        .into_iter()
        .any(|dims| dims.iter().skip(legacy_limit).any(|&d| d > 0))
}

/// Copy `src` into `dest`
///
/// The leading `min(src.len(), dest.len())` values are copied verbatim and
/// every remaining position of `dest` is zeroed. Returns the number of
/// values copied.
pub fn copy_dimensions(src: &[u32], dest: &mut [u32]) -> usize {
    let copied = src.len().min(dest.len());
    dest[..copied].copy_from_slice(&src[..copied]);
    dest[copied..].fill(0);
    copied
}

/// Zero every position at or beyond `legacy_limit`
///
/// Applied when the destination is not extended: legacy destinations never
/// keep extended-rank values.
pub fn clear_extended_ranks(dims: &mut [u32], legacy_limit: usize) {
    if legacy_limit < dims.len() {
        dims[legacy_limit..].fill(0);
    }
}

/// Number of leading non-zero values
pub fn rank(dims: &[u32]) -> usize {
    dims.iter().take_while(|&&d| d > 0).count()
}

/// Number of elements described by the leading non-zero values
///
/// Returns `Some(0)` for an empty (rank 0) array and `None` when the
/// product does not fit in `usize`.
pub fn element_count(dims: &[u32]) -> Option<usize> {
    match rank(dims) {
        0 => Some(0),
        r => dims[..r]
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d as usize)),
    }
}

/// Format the leading non-zero values as `"3:224:224:1"`
pub fn dimension_to_string(dims: &[u32]) -> String {
    dims[..rank(dims)]
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(":")
}

/// Parse the `"3:224:224:1"` form into an array of length `capacity`
///
/// # Example
/// ```
/// use tensorinfo_core::tensor::dimension::parse_dimension;
///
/// let dims = parse_dimension("3:224:224:1", 6).unwrap();
/// assert_eq!(dims, vec![3, 224, 224, 1, 0, 0]);
/// ```
pub fn parse_dimension(text: &str, capacity: usize) -> Result<Vec<u32>> {
    let text = text.trim();
    if text.is_empty() {
        return Err(invalid_parameter("The dimension string is empty."));
    }

    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > capacity {
        return Err(invalid_parameter(format!(
            "The dimension string '{}' has {} values, the rank limit is {}.",
            text,
            parts.len(),
            capacity
        )));
    }

    let mut dims = vec![0u32; capacity];
    for (slot, part) in dims.iter_mut().zip(&parts) {
        *slot = match part.trim().parse::<u32>() {
            Ok(d) if d > 0 => d,
            _ => {
                return Err(invalid_parameter(format!(
                    "The dimension string '{}' has an invalid value '{}'.",
                    text, part
                )))
            }
        };
    }
    Ok(dims)
}
