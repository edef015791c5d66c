//! End-to-end store workflows through files on disk

use std::fs;

use pixmill_core::config::load_engine_config;
use pixmill_core::decoders::ppm::parse_ppm;
use pixmill_core::presets::{save_preset_file, PresetFile};
use pixmill_core::{
    CodecError, ColorMatrix, FilterPreset, Image, ImageStore, Operation, Pixel, StoreError,
};
use tempfile::tempdir;

const FIXTURE_PPM: &str = "P3\n# four rows of three\n3 4\n255\n\
228 243 52 56 135 32 252 154 142\n\
207 191 127 81 163 148 66 94 1\n\
162 167 186 139 72 64 38 209 210\n\
129 70 102 92 80 1 80 177 113\n";

fn store_with_fixture_file() -> (tempfile::TempDir, ImageStore) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fixture.ppm");
    fs::write(&path, FIXTURE_PPM).unwrap();

    let mut store = ImageStore::new();
    store.load(&path, "fixture").unwrap();
    (dir, store)
}

#[test]
fn test_component_after_load() {
    let (_dir, mut store) = store_with_fixture_file();
    store.red_component("fixture", "red").unwrap();
    assert_eq!(store.get("red").unwrap().pixel(0, 0).to_rgb(), [228, 228, 228]);
}

#[test]
fn test_brighten_after_load() {
    let (_dir, mut store) = store_with_fixture_file();
    store.brighten(20, "fixture", "bright").unwrap();
    let bright = store.get("bright").unwrap();
    assert_eq!(bright.pixel(0, 0).to_rgb(), [248, 255, 72]);
    assert_eq!(bright.pixel(0, 1).to_rgb(), [76, 155, 52]);
}

#[test]
fn test_blur_after_load() {
    let (_dir, mut store) = store_with_fixture_file();
    store.blur("fixture", "soft").unwrap();
    assert_eq!(store.get("soft").unwrap().pixel(0, 0).to_rgb(), [94, 111, 42]);
}

#[test]
fn test_parse_reduced_maximum() {
    let image = parse_ppm("P3 2 2\n220\n76 0 153 76 0 153 102 0 204 102 0 204\n", "purple").unwrap();
    assert_eq!((image.width(), image.height(), image.max_channel()), (2, 2, 220));
    assert_eq!(
        image.row(0),
        &[Pixel::from_rgb([76, 0, 153]), Pixel::from_rgb([76, 0, 153])]
    );
}

#[test]
fn test_missing_and_replaced_names() {
    let (_dir, mut store) = store_with_fixture_file();
    assert!(matches!(store.get("missing"), Err(StoreError::NotFound(_))));

    store.sepia("fixture", "fixture").unwrap();
    let replaced = store.get("fixture").unwrap();
    assert_eq!(replaced.pixel(0, 0).to_rgb(), [255, 255, 198]);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_binary_formats_round_trip_through_store() {
    let (dir, mut store) = store_with_fixture_file();
    let original = store.get("fixture").unwrap().clone();

    for ext in ["png", "tiff", "TIF", "bmp"] {
        let path = dir.path().join("out").join(format!("fixture.{}", ext));
        store.save(&path, "fixture").unwrap();

        let name = format!("from-{}", ext);
        store.load(&path, &name).unwrap();
        let loaded = store.get(&name).unwrap();
        assert_eq!(loaded.pixels(), original.pixels(), "{} round trip", ext);
        assert_eq!(loaded.max_channel(), 255);
    }
}

#[test]
fn test_jpeg_save_load_keeps_dimensions() {
    let (dir, mut store) = store_with_fixture_file();
    let path = dir.path().join("fixture.jpg");
    store.save(&path, "fixture").unwrap();
    store.load(&path, "lossy").unwrap();

    let lossy = store.get("lossy").unwrap();
    assert_eq!((lossy.width(), lossy.height()), (3, 4));
}

#[test]
fn test_operation_script() {
    let (dir, mut store) = store_with_fixture_file();
    let script = [
        ("horizontal-flip", None, "fixture", "flipped"),
        ("brighten", Some(-40), "flipped", "dark"),
        ("luma-component", None, "dark", "luma"),
    ];
    for (name, increment, src, dest) in script {
        let op = Operation::from_name(name, increment).unwrap();
        store.apply(&op, src, dest).unwrap();
    }
    assert_eq!(store.last_touched_name(), "luma");
    assert_eq!(
        store.names().collect::<Vec<_>>(),
        vec!["fixture", "flipped", "dark", "luma"]
    );

    let out = dir.path().join("luma.ppm");
    store.save(&out, "luma").unwrap();
    let text = fs::read_to_string(&out).unwrap();
    let reparsed = parse_ppm(&text, "luma").unwrap();
    assert_eq!(&reparsed, store.get("luma").unwrap());
}

#[test]
fn test_config_presets_reach_the_store() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("pixmill.yml");
    fs::write(
        &config_path,
        "defaults:\n  create_parent_dirs: false\ncolor_matrices:\n  only-green:\n    - [0, 0, 0]\n    - [0, 1, 0]\n    - [0, 0, 0]\n",
    )
    .unwrap();

    let handle = load_engine_config(Some(&config_path));
    let mut store = ImageStore::with_config(&handle.config);
    store.add_or_replace(Image::blank(2, 1, 255, Pixel::from_rgb([10, 20, 30]), "src").unwrap());

    store.apply_filter("only-green", "src", "green").unwrap();
    assert_eq!(store.get("green").unwrap().pixel(0, 1).to_rgb(), [0, 20, 0]);

    let nested = dir.path().join("no").join("such").join("dir.ppm");
    assert!(matches!(
        store.save(&nested, "green"),
        Err(StoreError::Codec(CodecError::FileNotFound(_)))
    ));
}

#[test]
fn test_preset_directory_extends_store() {
    let dir = tempdir().unwrap();
    let preset = PresetFile {
        name: "swap-rb".to_string(),
        description: Some("swap red and blue".to_string()),
        filter: FilterPreset::ColorMatrix(ColorMatrix::new([
            [0.0, 0.0, 1.0],
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
        ])),
    };
    save_preset_file(&preset, dir.path().join("swap-rb.yml")).unwrap();

    let mut store = ImageStore::new();
    store.presets_mut().load_dir(dir.path()).unwrap();
    store.add_or_replace(Image::blank(1, 1, 255, Pixel::from_rgb([1, 2, 3]), "src").unwrap());
    store.apply_filter("swap-rb", "src", "swapped").unwrap();
    assert_eq!(store.get("swapped").unwrap().pixel(0, 0).to_rgb(), [3, 2, 1]);
}
