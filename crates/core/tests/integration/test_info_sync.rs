//! Integration tests for API <-> pipeline tensors-info synchronisation
//!
//! Covers the conversion entry points end to end:
//! 1. Round trips of non-extended collections
//! 2. Extended-rank detection and the extra store
//! 3. Lossy conversion into legacy destinations
//! 4. Rejection of absent inputs

use rand::Rng;
use tensorinfo_core::report::{clear_last_error, last_error};
use tensorinfo_core::tensor::{
    copy_from_pipeline, copy_to_pipeline, create_from_pipeline, to_api_type, to_pipeline_type,
    PipelineTensorInfo, PipelineTensorType, PipelineTensorsInfo, TensorType, TensorsInfo,
    LEGACY_RANK_LIMIT, PIPELINE_RANK_LIMIT, SIZE_LIMIT,
};
use tensorinfo_core::{Error, ErrorKind};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("tensorinfo_core=debug")
        .with_test_writer()
        .try_init();
}

/// Two tensors: "input" float32 [1,3,224,224] and an unnamed int32 [1]
fn image_model_info() -> PipelineTensorsInfo {
    let mut pipeline = PipelineTensorsInfo::new();
    pipeline.push(PipelineTensorInfo::new(
        Some("input"),
        PipelineTensorType::Float32,
        &[1, 3, 224, 224],
    ));
    pipeline.push(PipelineTensorInfo::new(None, PipelineTensorType::Int32, &[1]));
    pipeline
}

fn random_pipeline_info(rng: &mut impl Rng) -> PipelineTensorsInfo {
    let mut pipeline = PipelineTensorsInfo::new();
    let count = rng.gen_range(1..=40);
    for i in 0..count {
        let rank = rng.gen_range(1..=LEGACY_RANK_LIMIT);
        let dims: Vec<u32> = (0..rank).map(|_| rng.gen_range(1..=512)).collect();
        let name = format!("tensor_{}", i);
        let tensor_type = PipelineTensorType::from_code(rng.gen_range(0..11));
        let name = if rng.gen_bool(0.5) { Some(name.as_str()) } else { None };
        pipeline.push(PipelineTensorInfo::new(name, tensor_type, &dims));
    }
    pipeline
}

#[test]
fn test_create_from_pipeline_standard_scenario() {
    init_tracing();
    let info = create_from_pipeline(Some(&image_model_info())).unwrap();

    assert!(!info.is_extended());
    assert_eq!(info.count(), 2);

    assert_eq!(info.tensor_name(0).unwrap(), Some("input"));
    assert_eq!(info.tensor_type(0).unwrap(), TensorType::Float32);
    assert_eq!(info.tensor_dimension(0).unwrap(), &[1, 3, 224, 224]);

    assert_eq!(info.tensor_name(1).unwrap(), None);
    assert_eq!(info.tensor_type(1).unwrap(), TensorType::Int32);
    assert_eq!(info.tensor_dimension(1).unwrap(), &[1, 0, 0, 0]);

    // storage past the legacy rank is zero
    for tensor in info.iter() {
        assert!(tensor.dimension()[LEGACY_RANK_LIMIT..].iter().all(|&d| d == 0));
    }
}

#[test]
fn test_create_from_pipeline_extended_scenario() {
    init_tracing();
    let mut pipeline = image_model_info();
    pipeline.nth_info_mut(0).unwrap().dimension[LEGACY_RANK_LIMIT] = 2;

    let info = create_from_pipeline(Some(&pipeline)).unwrap();
    assert!(info.is_extended());
    assert!(info.has_extra());
    assert_eq!(&info.tensor_dimension(0).unwrap()[..6], &[1, 3, 224, 224, 2, 0]);

    let shared = info.into_shared();

    // legacy-capacity destination keeps the leading ranks only
    let mut legacy = PipelineTensorsInfo::with_rank_limit(LEGACY_RANK_LIMIT);
    copy_to_pipeline(Some(&mut legacy), Some(&shared)).unwrap();
    let tensor = legacy.nth_info(0).unwrap();
    assert_eq!(tensor.dimension[..LEGACY_RANK_LIMIT], [1, 3, 224, 224]);
    assert!(tensor.dimension[LEGACY_RANK_LIMIT..].iter().all(|&d| d == 0));
    assert_eq!(legacy.nth_info(1).unwrap().dimension[0], 1);

    // extended -> full-rank pipeline is lossless
    let mut back = PipelineTensorsInfo::new();
    copy_to_pipeline(Some(&mut back), Some(&shared)).unwrap();
    assert_eq!(back, pipeline);
}

#[test]
fn test_extended_collection_resynced_into_standard_form() {
    init_tracing();
    let mut info = TensorsInfo::new_extended().unwrap();
    info.set_count(1).unwrap();
    info.set_tensor_type(0, TensorType::UInt8).unwrap();
    info.set_tensor_dimension(0, &[2, 2, 2, 2, 2, 2]).unwrap();

    let mut pipeline = PipelineTensorsInfo::new();
    copy_to_pipeline(Some(&mut pipeline), Some(&info.into_nolock())).unwrap();
    assert_eq!(
        &pipeline.nth_info(0).unwrap().dimension[..7],
        &[2, 2, 2, 2, 2, 2, 0]
    );

    // a standard collection refreshed from it switches to the extended rank
    let mut standard = TensorsInfo::new().unwrap();
    copy_from_pipeline(Some(&mut standard), Some(&pipeline)).unwrap();
    assert!(standard.is_extended());
    assert_eq!(&standard.tensor_dimension(0).unwrap()[..6], &[2, 2, 2, 2, 2, 2]);
}

#[test]
fn test_extended_detection_at_limit_index() {
    let mut pipeline = image_model_info();
    let mut info = TensorsInfo::new().unwrap();

    copy_from_pipeline(Some(&mut info), Some(&pipeline)).unwrap();
    assert!(!info.is_extended());

    pipeline.nth_info_mut(1).unwrap().dimension[LEGACY_RANK_LIMIT] = 1;
    copy_from_pipeline(Some(&mut info), Some(&pipeline)).unwrap();
    assert!(info.is_extended());
    assert!(info.has_extra());

    pipeline.nth_info_mut(1).unwrap().dimension[LEGACY_RANK_LIMIT] = 0;
    pipeline.nth_info_mut(1).unwrap().dimension[PIPELINE_RANK_LIMIT - 1] = 9;
    copy_from_pipeline(Some(&mut info), Some(&pipeline)).unwrap();
    assert!(info.is_extended());
    assert_eq!(info.tensor_dimension(1).unwrap()[PIPELINE_RANK_LIMIT - 1], 9);
}

#[test]
fn test_round_trip_non_extended() {
    init_tracing();
    let mut rng = rand::thread_rng();

    for _ in 0..50 {
        let pipeline = random_pipeline_info(&mut rng);
        let info = create_from_pipeline(Some(&pipeline)).unwrap();
        assert!(!info.is_extended());
        assert_eq!(info.count(), pipeline.num_tensors);

        let mut back = PipelineTensorsInfo::new();
        copy_to_pipeline(Some(&mut back), Some(&info.into_nolock())).unwrap();

        assert_eq!(back.num_tensors, pipeline.num_tensors);
        for (a, b) in pipeline.iter().zip(back.iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.tensor_type, b.tensor_type);
            assert_eq!(a.dimension, b.dimension);
        }
    }
}

#[test]
fn test_round_trip_at_size_limit() {
    let mut pipeline = PipelineTensorsInfo::new();
    for i in 0..SIZE_LIMIT {
        let name = format!("t{}", i);
        pipeline.push(PipelineTensorInfo::new(
            Some(name.as_str()),
            PipelineTensorType::Float16,
            &[i as u32 + 1, 2],
        ));
    }

    let info = create_from_pipeline(Some(&pipeline)).unwrap();
    assert_eq!(info.count(), SIZE_LIMIT);
    assert_eq!(info.tensor_name(SIZE_LIMIT - 1).unwrap(), Some("t255"));

    let mut back = PipelineTensorsInfo::new();
    copy_to_pipeline(Some(&mut back), Some(&info.into_shared())).unwrap();
    assert_eq!(back, pipeline);
}

#[test]
fn test_type_mapping_bijection() {
    for code in 0..11 {
        let pipeline = PipelineTensorType::from_code(code);
        assert_eq!(to_pipeline_type(to_api_type(pipeline)), pipeline);
        assert_eq!(to_api_type(pipeline).code(), code);
    }

    clear_last_error();
    assert_eq!(
        to_api_type(PipelineTensorType::from_code(11)),
        TensorType::Unknown
    );
    assert!(last_error().is_some());

    clear_last_error();
    assert_eq!(
        to_pipeline_type(TensorType::from_code(-3)),
        PipelineTensorType::End
    );
    assert!(last_error().is_some());
}

#[test]
fn test_absent_inputs_are_rejected_without_mutation() {
    let pipeline = image_model_info();
    let mut info = create_from_pipeline(Some(&pipeline)).unwrap();
    let info_before = info.clone();

    let err = copy_from_pipeline(None, Some(&pipeline)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    let err = copy_from_pipeline(Some(&mut info), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert_eq!(info, info_before);

    let shared = info.into_shared();
    let mut target = image_model_info();
    let target_before = target.clone();

    clear_last_error();
    let err = copy_to_pipeline(None, Some(&shared)).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
    assert!(last_error().unwrap().contains("pipeline_info"));

    let err = copy_to_pipeline(Some(&mut target), None::<&parking_lot::Mutex<TensorsInfo>>)
        .unwrap_err();
    assert_eq!(err.code(), tensorinfo_core::error::ERROR_INVALID_PARAMETER);
    assert_eq!(target, target_before);

    assert!(matches!(
        create_from_pipeline(None),
        Err(Error::InvalidParameter(_))
    ));
}

#[test]
fn test_structurally_invalid_pipeline_info() {
    let mut pipeline = image_model_info();
    pipeline.num_tensors = SIZE_LIMIT + 1;

    let err = create_from_pipeline(Some(&pipeline)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}
