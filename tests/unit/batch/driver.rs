use super::*;
use crate::encode::ffmpeg::is_ffmpeg_on_path;

fn write_png(path: &Path, width: u32, height: u32, rgba: [u8; 4]) {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    img.save(path).unwrap();
}

fn tiny_settings() -> RenderSettings {
    RenderSettings {
        width: 32,
        height: 18,
        fps: 10,
        total_secs: 2.0,
        trailer_secs: 0.5,
        font_source: None,
        trailer_source: None,
        ..RenderSettings::default()
    }
}

struct RecordingSink {
    fail: bool,
    calls: std::sync::Mutex<Vec<String>>,
}

impl UploadSink for RecordingSink {
    fn upload(&self, _video: &Path, product_id: &str) -> ShowreelResult<String> {
        self.calls.lock().unwrap().push(product_id.to_string());
        if self.fail {
            Err(ShowreelError::upload("remote unavailable"))
        } else {
            Ok(format!("remote:{product_id}"))
        }
    }
}

#[test]
fn driver_construction_validates_settings_and_sources() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = BatchConfig::new(tmp.path().join("crops"), tmp.path().join("out"));

    let mut bad = tiny_settings();
    bad.fps = 0;
    assert!(BatchDriver::new(cfg.clone(), bad, None).is_err());

    let mut missing_trailer = tiny_settings();
    missing_trailer.trailer_source = Some(tmp.path().join("absent.png"));
    assert!(BatchDriver::new(cfg.clone(), missing_trailer, None).is_err());

    let mut missing_font = tiny_settings();
    missing_font.font_source = Some(tmp.path().join("absent.ttf"));
    assert!(BatchDriver::new(cfg, missing_font, None).is_err());
}

#[test]
fn batch_renders_uploads_and_contains_failures() {
    if !is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }

    let tmp = tempfile::tempdir().unwrap();
    let crops = tmp.path().join("crops");
    let out = tmp.path().join("videos");

    // Healthy product: two crops plus one broken file that costs only its
    // own segment.
    let good = crops.join("SKU-GOOD");
    std::fs::create_dir_all(&good).unwrap();
    write_png(&good.join("crop_01.png"), 40, 30, [200, 10, 10, 255]);
    write_png(&good.join("crop_02.png"), 30, 40, [10, 200, 10, 255]);
    std::fs::write(good.join("crop_03.png"), b"corrupted").unwrap();

    // Product with nothing usable after exclusion.
    let empty = crops.join("SKU-EMPTY");
    std::fs::create_dir_all(&empty).unwrap();
    write_png(&empty.join("ONLY_THUMBNAIL.png"), 20, 20, [0, 0, 0, 255]);

    let sink = RecordingSink {
        fail: false,
        calls: std::sync::Mutex::new(Vec::new()),
    };
    let driver = BatchDriver::new(
        BatchConfig::new(&crops, &out),
        tiny_settings(),
        Some(&sink),
    )
    .unwrap();
    let summary = driver.run().unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 0);

    let good_report = summary
        .reports
        .iter()
        .find(|r| r.product == "SKU-GOOD")
        .unwrap();
    assert_eq!(good_report.status, ProductStatus::Succeeded);
    assert_eq!(good_report.segments_used, 2);
    assert_eq!(good_report.segments_skipped, 1);
    assert_eq!(good_report.upload_id.as_deref(), Some("remote:SKU-GOOD"));
    assert!(out.join("SKU-GOOD.mp4").exists());

    let empty_report = summary
        .reports
        .iter()
        .find(|r| r.product == "SKU-EMPTY")
        .unwrap();
    assert!(matches!(empty_report.status, ProductStatus::Failed(_)));
    assert!(!out.join("SKU-EMPTY.mp4").exists());
    assert_eq!(sink.calls.lock().unwrap().as_slice(), ["SKU-GOOD"]);
}

#[test]
fn upload_failure_still_counts_as_success() {
    if !is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }

    let tmp = tempfile::tempdir().unwrap();
    let crops = tmp.path().join("crops");
    let product = crops.join("SKU-A");
    std::fs::create_dir_all(&product).unwrap();
    write_png(&product.join("crop.png"), 32, 18, [5, 5, 200, 255]);

    let sink = RecordingSink {
        fail: true,
        calls: std::sync::Mutex::new(Vec::new()),
    };
    let out = tmp.path().join("videos");
    let driver = BatchDriver::new(
        BatchConfig::new(&crops, &out),
        tiny_settings(),
        Some(&sink),
    )
    .unwrap();
    let summary = driver.run().unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 0);
    let report = &summary.reports[0];
    assert_eq!(report.status, ProductStatus::Succeeded);
    assert!(report.upload_id.is_none());
    assert!(out.join("SKU-A.mp4").exists());
}

#[test]
fn existing_outputs_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let crops = tmp.path().join("crops");
    let product = crops.join("SKU-DONE");
    std::fs::create_dir_all(&product).unwrap();
    write_png(&product.join("crop.png"), 32, 18, [1, 1, 1, 255]);

    let out = tmp.path().join("videos");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("SKU-DONE.mp4"), b"already here").unwrap();

    let driver =
        BatchDriver::new(BatchConfig::new(&crops, &out), tiny_settings(), None).unwrap();
    let summary = driver.run().unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.reports[0].status, ProductStatus::Skipped);
    // Untouched.
    assert_eq!(
        std::fs::read(out.join("SKU-DONE.mp4")).unwrap(),
        b"already here"
    );
}
