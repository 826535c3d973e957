use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::error::{InbetweenError, InbetweenResult};

/// `<stem>.gif` next to the video.
pub fn gif_path(video: &Path) -> PathBuf {
    video.with_extension("gif")
}

/// Scratch palette image for one conversion.
pub fn palette_path() -> PathBuf {
    std::env::temp_dir().join(format!("inbetween-palette-{}.png", std::process::id()))
}

pub fn palettegen_args(video: &Path, palette: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-i".into(),
        video.as_os_str().to_owned(),
        "-vf".into(),
        "palettegen".into(),
        palette.as_os_str().to_owned(),
    ]
}

pub fn paletteuse_args(video: &Path, palette: &Path, out: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-i".into(),
        video.as_os_str().to_owned(),
        "-i".into(),
        palette.as_os_str().to_owned(),
        "-filter_complex".into(),
        "paletteuse".into(),
        out.as_os_str().to_owned(),
    ]
}

/// Run the encoder to completion; a non-zero exit carries its stderr.
pub fn run_encoder(encoder: &Path, args: &[OsString]) -> InbetweenResult<()> {
    let output = Command::new(encoder)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            InbetweenError::encoder_process(format!(
                "failed to spawn '{}': {e}",
                encoder.display()
            ))
        })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(InbetweenError::encoder_process(format!(
            "encoder exited with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}

/// Convert an exported video to a palette-optimized GIF. Returns the GIF path.
#[tracing::instrument(skip_all, fields(video = %video.display()))]
pub fn make_gif(encoder: &Path, video: &Path) -> InbetweenResult<PathBuf> {
    let palette = palette_path();
    let out = gif_path(video);

    let converted = run_encoder(encoder, &palettegen_args(video, &palette))
        .and_then(|()| run_encoder(encoder, &paletteuse_args(video, &palette, &out)));
    let _ = std::fs::remove_file(&palette);
    converted?;

    tracing::info!(gif = %out.display(), "gif written");
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
