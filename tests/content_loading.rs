//! Integration tests for concurrent asset loading from disk.

use image::{Rgba as Pixel, RgbaImage};
use pixelfw::{ContentHandler, PixelFwError};
use std::path::Path;
use tempfile::TempDir;

fn write_png(dir: &Path, name: &str, width: u32, height: u32, color: [u8; 4]) {
    let img = RgbaImage::from_pixel(width, height, Pixel(color));
    img.save(dir.join(name)).unwrap();
}

#[test]
fn test_load_reports_partial_failure() {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "hero.png", 16, 8, [10, 20, 30, 255]);

    let mut content = ContentHandler::with_base_dir(dir.path());
    content.add_image("hero", "hero.png");
    content.add_image("ghost", "ghost.png");
    assert_eq!(content.pending(), 2);

    let report = content.load_all_blocking().unwrap();
    assert_eq!(report.loaded, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.total(), 2);
    assert_eq!(content.pending(), 0);

    let hero = content.image("hero").unwrap();
    assert_eq!((hero.width(), hero.height()), (16, 8));
    assert_eq!(hero.pixel(3, 3), Some([10, 20, 30, 255]));

    assert!(matches!(
        content.image("ghost"),
        Err(PixelFwError::AssetMissing(name)) if name == "ghost"
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_load_all_joins_every_file() {
    let dir = TempDir::new().unwrap();
    for i in 0..8u8 {
        write_png(dir.path(), &format!("tile{}.png", i), 4, 4, [i * 30, 0, 0, 255]);
    }

    let mut content = ContentHandler::with_base_dir(dir.path());
    for i in 0..8 {
        content.add_image(format!("tile{}", i), format!("tile{}.png", i));
    }

    let report = content.load_all().await;
    assert_eq!(report.loaded, 8);
    assert_eq!(report.failed, 0);
    assert_eq!(content.len(), 8);
    for i in 0..8u8 {
        let tile = content.get(&format!("tile{}", i)).unwrap();
        assert_eq!(tile.pixel(0, 0), Some([i * 30, 0, 0, 255]));
    }
}

#[test]
fn test_corrupt_file_counts_as_failure() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.png"), b"definitely not a png").unwrap();

    let mut content = ContentHandler::with_base_dir(dir.path());
    content.add_image("broken", "broken.png");
    let report = content.load_all_blocking().unwrap();

    assert_eq!(report.failed, 1);
    assert!(!content.contains("broken"));
    assert!(content.is_empty());
}

#[test]
fn test_loading_nothing_is_immediate() {
    let mut content = ContentHandler::new();
    let report = content.load_all_blocking().unwrap();
    assert_eq!(report.total(), 0);
}
