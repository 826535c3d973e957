use super::*;

use crate::foundation::core::Resolution;

fn args_of(opts: &FfmpegSinkOpts, fps: u32) -> Vec<String> {
    opts.args(fps)
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn args_stream_png_images_from_stdin() {
    let mut opts = FfmpegSinkOpts::new("/opt/ffmpeg", "out/video.mp4");
    opts.extra_args = vec!["-crf".to_string(), "18".to_string()];
    let args = args_of(&opts, 30);

    assert_eq!(args[0], "-y");
    let pos = |s: &str| args.iter().position(|a| a == s).unwrap();
    assert_eq!(args[pos("-f") + 1], "image2pipe");
    assert_eq!(args[pos("-framerate") + 1], "30");
    assert_eq!(args[pos("-i") + 1], "pipe:0");
    assert!(pos("-vcodec") < pos("-i"));
    assert!(pos("-crf") > pos("-i"));
    assert_eq!(args.last().unwrap(), "out/video.mp4");
}

#[test]
fn png_encoding_round_trips_pixels() {
    let frame = FrameRGBA::solid(Resolution::new(3, 2).unwrap(), [10, 20, 30, 128]);
    let png = encode_png(&frame).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (3, 2));
    assert_eq!(decoded.into_raw(), frame.data);
}

#[test]
fn missing_encoder_fails_on_begin() {
    let dir = std::env::temp_dir().join(format!("inbetween-ffmpeg-{}", std::process::id()));
    let encoder = dir.join("no-such-encoder");
    assert!(!is_encoder_available(&encoder));

    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&encoder, dir.join("video.mp4")));
    let err = sink
        .begin(SinkConfig {
            width: 4,
            height: 4,
            fps: 24,
        })
        .unwrap_err();
    assert!(matches!(err, InbetweenError::EncoderProcess(_)));
    assert!(dir.is_dir());
    assert!(sink.end().is_err());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn push_before_begin_is_rejected() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("ffmpeg", "video.mp4"));
    let frame = FrameRGBA::solid(Resolution::new(2, 2).unwrap(), [0, 0, 0, 255]);
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
}
