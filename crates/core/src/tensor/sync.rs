//! Synchronisation between API-side and pipeline-side tensors info
//!
//! - [`create_from_pipeline`] builds a fresh API collection, extended when
//!   the pipeline side uses ranks beyond [`LEGACY_RANK_LIMIT`]
//! - [`copy_from_pipeline`] refreshes an API collection the caller owns
//!   exclusively
//! - [`copy_to_pipeline`] writes an API collection into pipeline storage,
//!   holding the collection's lock for the whole copy
//!
//! Names are deep-copied, types go through the translation tables and
//! dimensions follow [`copy_dimensions`]. A destination that is not extended
//! never keeps values at or beyond the legacy rank limit.

use crate::report::invalid_parameter;
use crate::report_error;
use crate::tensor::dimension::{clear_extended_ranks, copy_dimensions, is_extended};
use crate::tensor::dtype::{to_api_type, to_pipeline_type};
use crate::tensor::info::{InfoForm, TensorsInfo};
use crate::tensor::lock::Lockable;
use crate::tensor::pipeline::{PipelineTensorInfo, PipelineTensorsInfo};
use crate::tensor::LEGACY_RANK_LIMIT;
use crate::Result;

/// Resolve descriptors `0..num_tensors` of a pipeline collection
fn pipeline_descriptors(pipeline: &PipelineTensorsInfo) -> Result<Vec<&PipelineTensorInfo>> {
    (0..pipeline.num_tensors)
        .map(|i| pipeline.nth_info(i))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| {
            invalid_parameter(
                "The parameter, pipeline_info, is invalid. It should be a valid pipeline tensors info. This is probably an internal bug.",
            )
        })
}

/// Whether a pipeline collection uses ranks beyond the legacy limit
pub fn pipeline_is_extended(pipeline: &PipelineTensorsInfo) -> Result<bool> {
    let descriptors = pipeline_descriptors(pipeline)?;
    Ok(is_extended(
        descriptors.iter().map(|t| &t.dimension[..]),
        LEGACY_RANK_LIMIT,
    ))
}

/// Create an API collection from pipeline tensors info
///
/// The extended constructor is used when any tensor has a non-zero
/// dimension at or beyond [`LEGACY_RANK_LIMIT`].
pub fn create_from_pipeline(pipeline: Option<&PipelineTensorsInfo>) -> Result<TensorsInfo> {
    let pipeline = pipeline.ok_or_else(|| {
        invalid_parameter(
            "The parameter, pipeline_info, is absent. It should be a valid pipeline tensors info. This could be an internal bug.",
        )
    })?;

    let form = if pipeline_is_extended(pipeline)? {
        InfoForm::Extended
    } else {
        InfoForm::Standard
    };

    let mut info = TensorsInfo::with_form(form).map_err(|e| {
        report_error!(
            "The call to create the {} tensors info has failed with {}.",
            form,
            e.code()
        );
        e
    })?;

    copy_from_pipeline(Some(&mut info), Some(pipeline))?;
    Ok(info)
}

/// Copy pipeline tensors info into an API collection
///
/// The destination must not be visible to other threads, so no lock is
/// taken. `is_extended` is recomputed from the source on every copy. An
/// extended-form destination keeps its rank limit and extra store even when
/// the flag clears.
pub fn copy_from_pipeline(
    info: Option<&mut TensorsInfo>,
    pipeline: Option<&PipelineTensorsInfo>,
) -> Result<()> {
    let info = info.ok_or_else(|| {
        invalid_parameter(
            "The parameter, info, is absent. It should be a valid tensors info, usually created by TensorsInfo::new(). This is probably an internal bug.",
        )
    })?;
    let pipeline = pipeline.ok_or_else(|| {
        invalid_parameter(
            "The parameter, pipeline_info, is absent. It should be a valid pipeline tensors info. This is probably an internal bug.",
        )
    })?;

    let sources = pipeline_descriptors(pipeline)?;
    let extended = is_extended(
        sources.iter().map(|t| &t.dimension[..]),
        LEGACY_RANK_LIMIT,
    );

    info.reset();
    info.num_tensors = sources.len();
    info.is_extended = extended;
    if pipeline.has_extra() || extended {
        info.create_extra()?;
    }
    let rank_limit = info.rank_limit();

    for (i, src) in sources.iter().enumerate() {
        let dest = info.nth_info_mut(i).ok_or_else(|| {
            invalid_parameter(
                "The parameter, info, is invalid. It should be a valid tensors info, usually created by TensorsInfo::new(). This is probably an internal bug.",
            )
        })?;

        dest.name = src.name.clone();
        dest.tensor_type = to_api_type(src.tensor_type);
        copy_dimensions(&src.dimension, &mut dest.dimension);
        clear_extended_ranks(&mut dest.dimension, rank_limit);
    }

    tracing::debug!(
        num_tensors = info.num_tensors,
        is_extended = info.is_extended,
        "copied tensors info from pipeline"
    );
    Ok(())
}

/// Copy an API collection into pipeline tensors info
///
/// The collection is locked before the first read and released on every
/// return path. The pipeline destination is reset first and keeps its rank
/// limit; dimensions past the smaller of the two rank limits are dropped.
pub fn copy_to_pipeline<L>(
    pipeline: Option<&mut PipelineTensorsInfo>,
    info: Option<&L>,
) -> Result<()>
where
    L: Lockable<Target = TensorsInfo> + ?Sized,
{
    let info = info.ok_or_else(|| {
        invalid_parameter(
            "The parameter, info, is absent. It should be a valid tensors info, usually created by TensorsInfo::new(). This is probably an internal bug.",
        )
    })?;
    let pipeline = pipeline.ok_or_else(|| {
        invalid_parameter(
            "The parameter, pipeline_info, is absent. It should be a valid pipeline tensors info. This is probably an internal bug.",
        )
    })?;

    let guard = info.acquire();
    let info: &TensorsInfo = &guard;

    pipeline.init();
    pipeline.num_tensors = info.count();
    let rank_limit = info.rank_limit().min(pipeline.rank_limit());

    for i in 0..info.count() {
        let src = info.nth_info(i).ok_or_else(|| {
            invalid_parameter(
                "The parameter, info, is invalid. It should be a valid tensors info, usually created by TensorsInfo::new(). This is probably an internal bug.",
            )
        })?;
        let dest = pipeline.nth_info_mut(i).ok_or_else(|| {
            invalid_parameter(
                "The parameter, pipeline_info, is invalid. It should be a valid pipeline tensors info. This is probably an internal bug.",
            )
        })?;

        dest.name = src.name.clone();
        dest.tensor_type = to_pipeline_type(src.tensor_type);
        copy_dimensions(&src.dimension, &mut dest.dimension);
        clear_extended_ranks(&mut dest.dimension, rank_limit);
    }

    tracing::debug!(
        num_tensors = pipeline.num_tensors,
        is_extended = info.is_extended(),
        "copied tensors info to pipeline"
    );
    Ok(())
}
