use std::fs;
use tempfile::TempDir;
use wormloop::assets::AssetCatalog;

fn seed_assets() -> TempDir {
    let root = TempDir::new().expect("temp assets root");
    let video = root.path().join("video");
    let models = root.path().join("mod");
    let images = root.path().join("img");
    fs::create_dir_all(&video).expect("video dir");
    fs::create_dir_all(&models).expect("mod dir");
    fs::create_dir_all(&images).expect("img dir");

    for name in ["zebra.webm", "aurora.webm", "notes.txt"] {
        fs::write(video.join(name), b"").expect("video file");
    }
    for name in ["teapot3.obj", "fruits.obj", "fruits.bmp"] {
        fs::write(models.join(name), b"").expect("model file");
    }
    for name in ["wall.png", "floor.JPG", "skip.webm"] {
        fs::write(images.join(name), b"").expect("image file");
    }
    root
}

#[test]
fn scan_filters_by_extension_and_sorts() {
    let root = seed_assets();
    let catalog = AssetCatalog::scan(root.path()).expect("scan");

    assert_eq!(catalog.videos, ["aurora.webm", "zebra.webm"]);
    assert_eq!(catalog.models, ["fruits", "teapot3"], "models are stripped of their extension");
    assert_eq!(catalog.images, ["floor.JPG", "wall.png"], "extension match is case-insensitive");
}

#[test]
fn missing_subdirectories_yield_empty_sets() {
    let root = TempDir::new().expect("temp assets root");
    let catalog = AssetCatalog::scan(root.path()).expect("scan");
    assert!(catalog.videos.is_empty());
    assert!(catalog.models.is_empty());
    assert!(catalog.images.is_empty());
}

#[test]
fn missing_root_is_an_error() {
    let root = TempDir::new().expect("temp assets root");
    let gone = root.path().join("nope");
    let err = AssetCatalog::scan(&gone).unwrap_err();
    assert!(err.to_string().contains("not a directory"));
}
