//! Tests for the named image store

use super::*;
use crate::error::{CodecError, ImageError};
use std::fs;
use tempfile::tempdir;

fn px(r: u8, g: u8, b: u8) -> Pixel {
    Pixel::from_rgb([r, g, b])
}

fn four_by_three(name: &str) -> Image {
    let grid = vec![
        vec![px(228, 243, 52), px(56, 135, 32), px(252, 154, 142)],
        vec![px(207, 191, 127), px(81, 163, 148), px(66, 94, 1)],
        vec![px(162, 167, 186), px(139, 72, 64), px(38, 209, 210)],
        vec![px(129, 70, 102), px(92, 80, 1), px(80, 177, 113)],
    ];
    Image::with_default_max(&grid, name).unwrap()
}

fn store_with_fixture() -> ImageStore {
    let mut store = ImageStore::new();
    store.add_or_replace(four_by_three("fourByThree"));
    store
}

// ============================================================================
// Bookkeeping
// ============================================================================

#[test]
fn test_empty_store() {
    let store = ImageStore::new();
    assert!(store.is_empty());
    assert_eq!(store.last_touched_name(), "");
    assert!(store.current_image().is_none());
    assert!(store.render_current().is_none());
}

#[test]
fn test_new_store_follows_global_config() {
    let handle = config::engine_config_handle();
    assert!(std::ptr::eq(handle, config::engine_config_handle()));

    let store = ImageStore::new();
    assert_eq!(store.create_parent_dirs, handle.config.defaults.create_parent_dirs);
    assert_eq!(
        store.default_max_channel,
        handle.config.defaults.default_max_channel
    );
    assert_eq!(
        store.presets().len(),
        PresetLibrary::from_config(&handle.config).len()
    );
}

#[test]
fn test_get_missing_is_not_found() {
    let store = store_with_fixture();
    assert!(matches!(
        store.get("missing"),
        Err(StoreError::NotFound(name)) if name == "missing"
    ));
}

#[test]
fn test_replace_by_name_keeps_newest() {
    let mut store = store_with_fixture();
    store.add_or_replace(Image::blank(1, 1, 255, px(1, 2, 3), "other").unwrap());
    store.add_or_replace(Image::blank(2, 2, 255, px(9, 9, 9), "fourByThree").unwrap());

    assert_eq!(store.len(), 2);
    let replaced = store.get("fourByThree").unwrap();
    assert_eq!(replaced.width(), 2);
    assert_eq!(replaced.pixel(0, 0).to_rgb(), [9, 9, 9]);
    assert_eq!(store.last_touched_name(), "fourByThree");
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["other", "fourByThree"]);
}

#[test]
fn test_remove_falls_back_to_newest_remaining() {
    let mut store = store_with_fixture();
    store.add_or_replace(Image::blank(1, 1, 255, px(0, 0, 0), "a").unwrap());
    store.add_or_replace(Image::blank(1, 1, 255, px(0, 0, 0), "b").unwrap());

    let removed = store.remove("b").unwrap();
    assert_eq!(removed.name(), "b");
    assert_eq!(store.last_touched_name(), "a");

    store.remove("fourByThree").unwrap();
    assert_eq!(store.last_touched_name(), "a");

    store.remove("a").unwrap();
    assert_eq!(store.last_touched_name(), "");
    assert!(matches!(store.remove("a"), Err(StoreError::NotFound(_))));
}

#[test]
fn test_add_blank_uses_configured_maximum() {
    let mut config = EngineConfig::default();
    config.defaults.default_max_channel = 100;
    let mut store = ImageStore::with_config(&config);

    store.add_blank(3, 2, "canvas").unwrap();
    let canvas = store.get("canvas").unwrap();
    assert_eq!(canvas.max_channel(), 100);
    assert_eq!((canvas.width(), canvas.height()), (3, 2));

    assert!(matches!(
        store.add_blank(0, 2, "nothing"),
        Err(StoreError::Image(ImageError::EmptyGrid))
    ));
}

#[test]
fn test_add_blank_rejects_overflowing_dimensions() {
    let mut store = ImageStore::new();
    assert!(matches!(
        store.add_blank(usize::MAX, 2, "huge"),
        Err(StoreError::Image(ImageError::TooLarge { .. }))
    ));
    assert!(store.is_empty());
}

// ============================================================================
// Named operations
// ============================================================================

#[test]
fn test_red_component_registers_destination() {
    let mut store = store_with_fixture();
    store.red_component("fourByThree", "red").unwrap();

    let red = store.get("red").unwrap();
    assert_eq!(red.pixel(0, 0).to_rgb(), [228, 228, 228]);
    assert_eq!(store.last_touched_name(), "red");
    // source untouched
    assert_eq!(
        store.get("fourByThree").unwrap().pixel(0, 0).to_rgb(),
        [228, 243, 52]
    );
}

#[test]
fn test_brighten() {
    let mut store = store_with_fixture();
    store.brighten(20, "fourByThree", "bright").unwrap();

    let bright = store.get("bright").unwrap();
    assert_eq!(bright.pixel(0, 0).to_rgb(), [248, 255, 72]);
    assert_eq!(bright.pixel(0, 1).to_rgb(), [76, 155, 52]);
}

#[test]
fn test_blur_and_sharpen() {
    let mut store = store_with_fixture();
    store.blur("fourByThree", "blurred").unwrap();
    store.sharpen("fourByThree", "sharp").unwrap();

    assert_eq!(store.get("blurred").unwrap().pixel(0, 0).to_rgb(), [94, 111, 42]);
    assert_eq!(store.get("sharp").unwrap().pixel(0, 0).to_rgb(), [255, 255, 91]);
}

#[test]
fn test_operations_on_missing_source() {
    let mut store = store_with_fixture();
    assert!(matches!(
        store.sepia("ghost", "out"),
        Err(StoreError::NotFound(name)) if name == "ghost"
    ));
    assert!(!store.contains("out"));
    assert_eq!(store.last_touched_name(), "fourByThree");
}

#[test]
fn test_operation_with_empty_destination() {
    let mut store = store_with_fixture();
    assert!(matches!(
        store.greyscale("fourByThree", ""),
        Err(StoreError::Image(ImageError::EmptyName))
    ));
}

#[test]
fn test_in_place_operation_replaces_source() {
    let mut store = store_with_fixture();
    store.horizontal_flip("fourByThree", "fourByThree").unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(
        store.get("fourByThree").unwrap().pixel(0, 0).to_rgb(),
        [252, 154, 142]
    );
}

#[test]
fn test_apply_matches_named_methods() {
    for name in Operation::NAMES {
        let op = Operation::from_name(name, Some(-30)).unwrap();
        assert_eq!(op.name(), name);

        let mut by_op = store_with_fixture();
        by_op.apply(&op, "fourByThree", "out").unwrap();

        let mut by_method = store_with_fixture();
        let result = match name {
            "red-component" => by_method.red_component("fourByThree", "out"),
            "green-component" => by_method.green_component("fourByThree", "out"),
            "blue-component" => by_method.blue_component("fourByThree", "out"),
            "value-component" => by_method.value_component("fourByThree", "out"),
            "intensity-component" => by_method.intensity_component("fourByThree", "out"),
            "luma-component" => by_method.luma_component("fourByThree", "out"),
            "vertical-flip" => by_method.vertical_flip("fourByThree", "out"),
            "horizontal-flip" => by_method.horizontal_flip("fourByThree", "out"),
            "brighten" => by_method.brighten(-30, "fourByThree", "out"),
            "blur" => by_method.blur("fourByThree", "out"),
            "sharpen" => by_method.sharpen("fourByThree", "out"),
            "greyscale" => by_method.greyscale("fourByThree", "out"),
            "sepia" => by_method.sepia("fourByThree", "out"),
            other => panic!("unexpected operation {}", other),
        };
        result.unwrap();

        assert_eq!(by_op.get("out").unwrap(), by_method.get("out").unwrap(), "{}", name);
    }
}

#[test]
fn test_operation_from_name_errors() {
    assert!(matches!(
        Operation::from_name("emboss", None),
        Err(StoreError::UnknownOperation(name)) if name == "emboss"
    ));
    assert!(matches!(
        Operation::from_name("brighten", None),
        Err(StoreError::Image(ImageError::InvalidArgument(_)))
    ));
    assert_eq!(Operation::from_name("blur", Some(5)).unwrap(), Operation::Blur);
    assert_eq!(Operation::Brighten(-4).to_string(), "brighten -4");
}

#[test]
fn test_apply_filter_presets() {
    let mut config = EngineConfig::default();
    config.color_matrices.insert(
        "drop-red".to_string(),
        vec![vec![0.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]],
    );
    let mut store = ImageStore::with_config(&config);
    store.add_or_replace(four_by_three("fourByThree"));

    store.apply_filter("drop-red", "fourByThree", "cyan").unwrap();
    assert_eq!(store.get("cyan").unwrap().pixel(0, 0).to_rgb(), [0, 243, 52]);

    store.apply_filter("sepia", "fourByThree", "old").unwrap();
    store.sepia("fourByThree", "old2").unwrap();
    assert_eq!(
        store.get("old").unwrap().pixels(),
        store.get("old2").unwrap().pixels()
    );

    assert!(matches!(
        store.apply_filter("emboss", "fourByThree", "x"),
        Err(StoreError::UnknownPreset(_))
    ));
}

// ============================================================================
// Histograms and rendering
// ============================================================================

#[test]
fn test_histograms() {
    let store = store_with_fixture();
    let red = store.red_histogram("fourByThree").unwrap();
    assert_eq!(red.total(), 12);
    assert_eq!(red.get(228), 1);
    assert_eq!(store.green_histogram("fourByThree").unwrap().get(243), 1);
    assert_eq!(store.blue_histogram("fourByThree").unwrap().get(1), 2);
    assert_eq!(store.intensity_histogram("fourByThree").unwrap().total(), 12);
    assert_eq!(
        store
            .histogram("fourByThree", ChannelSelector::Luma)
            .unwrap()
            .total(),
        12
    );
    assert!(matches!(
        store.red_histogram("missing"),
        Err(StoreError::NotFound(_))
    ));

    let all = store.channel_histograms("fourByThree").unwrap();
    assert_eq!(all.red, red);
}

#[test]
fn test_render_current_packs_last_touched() {
    let mut store = store_with_fixture();
    store.vertical_flip("fourByThree", "flipped").unwrap();

    let buffer = store.render_current().unwrap();
    assert_eq!((buffer.width(), buffer.height()), (3, 4));
    assert_eq!(buffer.data().len(), 12);
    // flipped (0,0) is the fixture's (3,0): (129, 70, 102)
    assert_eq!(buffer.data()[0], 0x0081_4666);
    assert_eq!(&buffer.to_rgb8()[..3], &[129, 70, 102]);
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_save_and_load_ppm() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fixture.ppm");
    let mut store = store_with_fixture();

    store.save(&path, "fourByThree").unwrap();
    assert!(fs::read_to_string(&path).unwrap().starts_with("P3 3 4\n255\n228\n243\n52\n"));

    store.load(&path, "reloaded").unwrap();
    assert_eq!(store.last_touched_name(), "reloaded");
    assert_eq!(
        store.get("reloaded").unwrap().pixels(),
        store.get("fourByThree").unwrap().pixels()
    );
}

#[test]
fn test_save_creates_parent_dirs_when_configured() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("a").join("b").join("fixture.png");

    let store = store_with_fixture();
    store.save(&nested, "fourByThree").unwrap();
    assert!(nested.exists());

    let mut config = EngineConfig::default();
    config.defaults.create_parent_dirs = false;
    let mut strict = ImageStore::with_config(&config);
    strict.add_or_replace(four_by_three("fourByThree"));
    let other = dir.path().join("c").join("fixture.png");
    assert!(matches!(
        strict.save(&other, "fourByThree"),
        Err(StoreError::Codec(CodecError::FileNotFound(_)))
    ));
}

#[test]
fn test_save_errors() {
    let dir = tempdir().unwrap();
    let store = store_with_fixture();

    assert!(matches!(
        store.save(dir.path().join("x.ppm"), "missing"),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.save(dir.path().join("x.gif"), "fourByThree"),
        Err(StoreError::Codec(CodecError::UnsupportedFormat(_)))
    ));
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let mut store = ImageStore::new();
    assert!(matches!(
        store.load(dir.path().join("absent.ppm"), "absent"),
        Err(StoreError::Codec(CodecError::FileNotFound(_)))
    ));
    assert!(store.is_empty());
}
