use super::*;

#[test]
fn config_validation_catches_bad_values() {
    assert!(
        EncodeConfig {
            width: 0,
            height: 10,
            fps: 30,
            out_path: PathBuf::from("out/video.mp4"),
            overwrite: true,
        }
        .validate()
        .is_err()
    );

    assert!(
        EncodeConfig {
            width: 11,
            height: 10,
            fps: 30,
            out_path: PathBuf::from("out/video.mp4"),
            overwrite: true,
        }
        .validate()
        .is_err()
    );

    assert!(
        EncodeConfig {
            width: 10,
            height: 10,
            fps: 0,
            out_path: PathBuf::from("out/video.mp4"),
            overwrite: true,
        }
        .validate()
        .is_err()
    );

    default_mp4_config("out/video.mp4", 1920, 1080, 30)
        .validate()
        .unwrap();
}

#[test]
fn default_config_overwrites() {
    let cfg = default_mp4_config("out/video.mp4", 640, 360, 30);
    assert!(cfg.overwrite);
    assert_eq!(cfg.out_path, PathBuf::from("out/video.mp4"));
}

#[test]
fn encoder_round_trip_when_ffmpeg_available() {
    if !is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("nested").join("clip.mp4");
    let cfg = default_mp4_config(&out_path, 64, 36, 30);

    let mut enc = FfmpegEncoder::new(cfg).unwrap();
    let frame = crate::foundation::core::FrameRGBA::solid(
        crate::foundation::core::Canvas {
            width: 64,
            height: 36,
        },
        [200, 40, 40, 255],
    );
    for _ in 0..30 {
        enc.encode_frame(&frame).unwrap();
    }
    enc.finish().unwrap();

    let meta = std::fs::metadata(&out_path).unwrap();
    assert!(meta.len() > 0);
}

#[test]
fn encoder_rejects_mismatched_frames() {
    if !is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let cfg = default_mp4_config(dir.path().join("clip.mp4"), 64, 36, 30);
    let mut enc = FfmpegEncoder::new(cfg).unwrap();

    let wrong = crate::foundation::core::FrameRGBA::solid(
        crate::foundation::core::Canvas {
            width: 32,
            height: 36,
        },
        [0, 0, 0, 255],
    );
    assert!(enc.encode_frame(&wrong).is_err());
}
