use super::*;
use crate::foundation::core::Canvas;

struct CollectSink {
    frames: Vec<FrameRGBA>,
}

impl CollectSink {
    fn new() -> Self {
        Self { frames: Vec::new() }
    }
}

impl FrameSink for CollectSink {
    fn write_frame(&mut self, frame: &FrameRGBA) -> ShowreelResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

struct FailingSink;

impl FrameSink for FailingSink {
    fn write_frame(&mut self, _frame: &FrameRGBA) -> ShowreelResult<()> {
        Err(ShowreelError::encoding("sink rejected frame"))
    }
}

fn tiny_settings() -> RenderSettings {
    RenderSettings {
        width: 16,
        height: 10,
        fps: 30,
        total_secs: 45.0,
        trailer_secs: 3.0,
        font_source: None,
        ..RenderSettings::default()
    }
}

fn solid_source(width: u32, height: u32, rgba: [u8; 4]) -> SourceImage {
    let mut rgba8 = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        rgba8.extend_from_slice(&rgba);
    }
    SourceImage {
        width,
        height,
        rgba8,
    }
}

#[test]
fn five_sources_yield_spec_frame_totals() {
    // 5 images @ 30fps over 45s with a 3s trailer: 252 frames per segment,
    // 90 trailer frames, 1350 total.
    let sources: Vec<_> = (0..5)
        .map(|i| solid_source(16, 10, [i as u8 * 40, 0, 0, 255]))
        .collect();
    let trailer = solid_source(16, 10, [0, 0, 255, 255]);

    let mut assembler = Assembler::new(tiny_settings(), None).unwrap();
    let mut sink = CollectSink::new();
    let mut rng = Rng64::new(11);
    let stats = assembler
        .assemble(&sources, Some(&trailer), &mut sink, &mut rng)
        .unwrap();

    assert_eq!(stats.segments, 5);
    assert_eq!(stats.frames_written, 5 * 252 + 90);
    assert_eq!(sink.frames.len(), 1350);
    assert!(sink.frames.iter().all(|f| (f.width, f.height) == (16, 10)));

    // The trailer occupies the tail, identical letterboxed frames.
    let tail = &sink.frames[5 * 252..];
    assert_eq!(tail.len(), 90);
    assert!(tail.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn no_trailer_means_no_tail_frames() {
    let sources = vec![solid_source(16, 10, [10, 20, 30, 255])];
    let mut assembler = Assembler::new(tiny_settings(), None).unwrap();
    let mut sink = CollectSink::new();
    let mut rng = Rng64::new(1);
    let stats = assembler
        .assemble(&sources, None, &mut sink, &mut rng)
        .unwrap();

    // One segment gets the whole non-trailer budget: 42s at 30fps.
    assert_eq!(stats.frames_written, 42 * 30);
    assert_eq!(stats.overlays_applied, 0);
}

#[test]
fn empty_sources_fail_with_no_source_images() {
    let mut assembler = Assembler::new(tiny_settings(), None).unwrap();
    let mut sink = CollectSink::new();
    let mut rng = Rng64::new(1);
    let err = assembler
        .assemble(&[], None, &mut sink, &mut rng)
        .unwrap_err();
    assert!(matches!(err, ShowreelError::NoSourceImages(_)));
    assert!(sink.frames.is_empty());
}

#[test]
fn sink_errors_propagate_as_failures() {
    let sources = vec![solid_source(16, 10, [1, 2, 3, 255])];
    let mut assembler = Assembler::new(tiny_settings(), None).unwrap();
    let mut rng = Rng64::new(1);
    let err = assembler
        .assemble(&sources, None, &mut FailingSink, &mut rng)
        .unwrap_err();
    assert!(matches!(err, ShowreelError::Encoding(_)));
}

#[test]
fn mismatched_storyboard_is_rejected() {
    let sources = vec![solid_source(16, 10, [1, 2, 3, 255])];
    let mut rng = Rng64::new(1);
    let board = Storyboard::plan(&tiny_settings(), 2, false, &mut rng).unwrap();

    let mut assembler = Assembler::new(tiny_settings(), None).unwrap();
    let err = assembler
        .run(&board, &sources, None, &mut CollectSink::new(), &mut rng)
        .unwrap_err();
    assert!(matches!(err, ShowreelError::Validation(_)));
}

#[test]
fn first_frame_of_each_segment_is_the_letterboxed_source() {
    let sources = vec![
        solid_source(8, 10, [255, 0, 0, 255]),
        solid_source(8, 10, [0, 255, 0, 255]),
    ];
    let settings = RenderSettings {
        total_secs: 5.0,
        trailer_secs: 1.0,
        ..tiny_settings()
    };
    let canvas = Canvas {
        width: 16,
        height: 10,
    };

    let mut assembler = Assembler::new(settings.clone(), None).unwrap();
    let mut sink = CollectSink::new();
    let mut rng = Rng64::new(3);
    let stats = assembler
        .assemble(&sources, None, &mut sink, &mut rng)
        .unwrap();

    // 2s per segment at 30fps.
    assert_eq!(stats.frames_written, 120);
    let expected_first = crate::motion::letterbox::letterbox(&sources[0], canvas);
    assert_eq!(sink.frames[0], expected_first);
    let expected_second = crate::motion::letterbox::letterbox(&sources[1], canvas);
    assert_eq!(sink.frames[60], expected_second);
}

#[test]
fn assembly_is_deterministic_for_a_seed() {
    let sources: Vec<_> = (0..3)
        .map(|i| solid_source(12, 10, [i as u8 * 80, 10, 10, 255]))
        .collect();
    let settings = RenderSettings {
        total_secs: 4.0,
        trailer_secs: 1.0,
        ..tiny_settings()
    };

    let render = |seed: u64| -> Vec<FrameRGBA> {
        let mut assembler = Assembler::new(settings.clone(), None).unwrap();
        let mut sink = CollectSink::new();
        let mut rng = Rng64::new(seed);
        assembler
            .assemble(&sources, None, &mut sink, &mut rng)
            .unwrap();
        sink.frames
    };

    assert_eq!(render(42), render(42));
}
