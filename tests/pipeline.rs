use std::fs;

use specimen_roi::selection::BorderKind;
use specimen_roi::{
    save_png, BatchJob, FileImageSource, ImageMetadata, PipelineConfig, Point, Raster,
    Rectangle, RoiError, RoiPipeline, YamlMetadataStore,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 100x100 black raster with a 20x20 block of 200 at (40, 40).
fn block_scene() -> Raster {
    let mut raster = Raster::new(100, 100, 0).unwrap();
    for y in 40..60 {
        for x in 40..60 {
            raster.set(x, y, 200);
        }
    }
    raster
}

fn block_metadata() -> ImageMetadata {
    ImageMetadata {
        crop: Rectangle::new(0, 0, 100, 100),
        threshold: 100,
        seeds: vec![Point::new(0, 0)],
    }
}

fn in_block(x: usize, y: usize) -> bool {
    (40..60).contains(&x) && (40..60).contains(&y)
}

#[test]
fn block_scene_end_to_end() {
    init_logging();
    let pipeline = RoiPipeline::new(PipelineConfig::default()).unwrap();
    let result = pipeline.run_detailed(&block_scene(), &block_metadata()).unwrap();

    for y in 0..100 {
        for x in 0..100 {
            let expected = if in_block(x, y) { 255 } else { 0 };
            assert_eq!(result.binary.get(x, y), Some(expected), "binary ({x}, {y})");
        }
    }

    assert_eq!(result.selected, 1);
    assert_eq!(result.contours.kind(0), Some(BorderKind::Frame));
    assert_eq!(result.contours.kind(1), Some(BorderKind::Outer));
    let block = &result.contours.contours()[1];
    assert_eq!(block.len(), 4);
    assert_eq!(block.area(), 361.0);

    let corners = vec![
        Point::new(40, 40),
        Point::new(59, 40),
        Point::new(59, 59),
        Point::new(40, 59),
    ];
    assert_eq!(result.hull.vertices(), corners.as_slice());

    // Exterior flooded, block interior keeps the original intensity.
    for y in 0..100 {
        for x in 0..100 {
            let expected = if in_block(x, y) { 200 } else { 255 };
            assert_eq!(result.composite.get(x, y), Some(expected), "composite ({x}, {y})");
        }
    }

    // Only the 2px rim inside the block sees the bright exterior.
    let mut rim = 0;
    for y in 0..100 {
        for x in 0..100 {
            let near_edge = in_block(x, y)
                && (x < 42 || x > 57 || y < 42 || y > 57);
            let value = result.output.get(x, y).unwrap();
            if near_edge {
                assert_eq!(value, 55, "rim ({x}, {y})");
                rim += 1;
            } else {
                assert_eq!(value, 0, "pixel ({x}, {y})");
            }
        }
    }
    assert_eq!(rim, 20 * 20 - 16 * 16);
}

#[test]
fn skip_first_relies_on_leading_frame_contour() {
    init_logging();
    // Contour 0 is always the raster frame, so skipping it lands on the block.
    let skipping = RoiPipeline::default()
        .run_detailed(&block_scene(), &block_metadata())
        .unwrap();
    assert_eq!(skipping.selected, 1);

    // Without the skip the frame wins and its hull covers the whole crop,
    // so the flood mask is erased everywhere.
    let config = PipelineConfig {
        skip_first_contour: false,
        ..PipelineConfig::default()
    };
    let keeping = RoiPipeline::new(config)
        .unwrap()
        .run_detailed(&block_scene(), &block_metadata())
        .unwrap();
    assert_eq!(keeping.selected, 0);
    assert_eq!(keeping.composite, block_scene());
    assert_eq!(keeping.output.get(38, 50), Some(200));
    assert_eq!(keeping.output.get(50, 50), Some(0));
}

#[test]
fn cropped_scene_uses_crop_coordinates() {
    init_logging();
    let metadata = ImageMetadata {
        crop: Rectangle::new(30, 30, 40, 40),
        threshold: 100,
        seeds: vec![Point::new(0, 0), Point::new(39, 39)],
    };
    let result = RoiPipeline::default()
        .run_detailed(&block_scene(), &metadata)
        .unwrap();
    assert_eq!((result.output.width(), result.output.height()), (40, 40));
    assert_eq!(result.hull.vertices()[0], Point::new(10, 10));
    assert_eq!(result.output.get(10, 20), Some(55));
    assert_eq!(result.output.get(20, 20), Some(0));
    assert_eq!(result.output.get(5, 5), Some(0));
}

#[test]
fn files_on_disk_round_trip() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    save_png(&block_scene(), &data_dir.join("block.png")).unwrap();

    let yaml = "%YAML:1.0\n---\nblock:\n  crop: { x: 0, y: 0, width: 100, height: 100 }\n  threshold: 100\n  filler:\n    - { x: 0, y: 0 }\n";
    let metadata_path = dir.path().join("data.yaml");
    fs::write(&metadata_path, yaml).unwrap();
    let store = YamlMetadataStore::from_path(&metadata_path).unwrap();

    let pipeline = RoiPipeline::default();
    let output = pipeline
        .run_source(&store, &FileImageSource, "block", &data_dir.join("block.png"))
        .unwrap();
    let expected = pipeline.run(&block_scene(), &block_metadata()).unwrap();
    assert_eq!(output, expected);

    let out_path = dir.path().join("out").join("block.png");
    save_png(&output, &out_path).unwrap();
    assert!(out_path.exists());
}

#[test]
fn metadata_is_resolved_before_the_image() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let store = YamlMetadataStore::from_yaml_str(
        "block:\n  crop: { x: 0, y: 0, width: 100, height: 100 }\n  threshold: 100\n  filler: []\n",
    )
    .unwrap();
    let missing = dir.path().join("absent.jpg");
    let pipeline = RoiPipeline::default();

    let err = pipeline
        .run_source(&store, &FileImageSource, "other", &missing)
        .unwrap_err();
    assert_eq!(err, RoiError::MetadataMissing { id: "other".into() });

    let err = pipeline
        .run_source(&store, &FileImageSource, "block", &missing)
        .unwrap_err();
    assert!(matches!(err, RoiError::ImageLoadFailed { .. }));
}

#[test]
fn batch_failures_stay_isolated() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    save_png(&block_scene(), &dir.path().join("block.png")).unwrap();
    let store = YamlMetadataStore::from_yaml_str(
        "block:\n  crop: { x: 0, y: 0, width: 100, height: 100 }\n  threshold: 100\n  filler:\n    - { x: 0, y: 0 }\n\
         bad_threshold:\n  crop: { x: 0, y: 0, width: 100, height: 100 }\n  threshold: 300\n  filler: []\n",
    )
    .unwrap();

    let jobs = vec![
        BatchJob::new("block", dir.path().join("block.png")),
        BatchJob::new("bad_threshold", dir.path().join("block.png")),
        BatchJob::new("block", dir.path().join("gone.png")),
        BatchJob::new("block", dir.path().join("block.png")),
    ];
    let results = RoiPipeline::default().run_batch(&store, &FileImageSource, &jobs);

    assert_eq!(results.len(), 4);
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(RoiError::InvalidParameter { name: "threshold", .. })
    ));
    assert!(matches!(results[2], Err(RoiError::ImageLoadFailed { .. })));
    assert_eq!(results[0], results[3]);
}
