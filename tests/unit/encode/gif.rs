use super::*;

fn strings(args: Vec<OsString>) -> Vec<String> {
    args.into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn gif_lands_next_to_the_video() {
    assert_eq!(
        gif_path(Path::new("out/video.mp4")),
        PathBuf::from("out/video.gif")
    );
    assert_eq!(gif_path(Path::new("clip")), PathBuf::from("clip.gif"));
}

#[test]
fn two_pass_arguments() {
    let video = Path::new("video.mp4");
    let palette = Path::new("/tmp/palette.png");
    assert_eq!(
        strings(palettegen_args(video, palette)),
        ["-y", "-i", "video.mp4", "-vf", "palettegen", "/tmp/palette.png"]
    );
    assert_eq!(
        strings(paletteuse_args(video, palette, Path::new("video.gif"))),
        [
            "-y",
            "-i",
            "video.mp4",
            "-i",
            "/tmp/palette.png",
            "-filter_complex",
            "paletteuse",
            "video.gif"
        ]
    );
}

#[test]
fn missing_encoder_is_a_process_error() {
    let err = make_gif(
        Path::new("/nonexistent/inbetween/encoder"),
        Path::new("video.mp4"),
    )
    .unwrap_err();
    assert!(matches!(err, InbetweenError::EncoderProcess(_)));
}
