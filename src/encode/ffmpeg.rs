use std::ffi::OsString;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRGBA};
use crate::foundation::error::{InbetweenError, InbetweenResult};

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Encoder executable, usually an `ffmpeg` build.
    pub encoder: PathBuf,
    pub out_path: PathBuf,
    /// Output arguments inserted right before the output path.
    pub extra_args: Vec<String>,
}

impl FfmpegSinkOpts {
    pub fn new(encoder: impl Into<PathBuf>, out_path: impl Into<PathBuf>) -> Self {
        Self {
            encoder: encoder.into(),
            out_path: out_path.into(),
            extra_args: Vec::new(),
        }
    }

    /// Full argument list for a stream of PNG images on stdin at `fps`.
    pub fn args(&self, fps: u32) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-y",
            "-loglevel",
            "error",
            "-f",
            "image2pipe",
            "-framerate",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        args.push(fps.to_string().into());
        // Input decoder for the piped images; the output codec follows the file extension.
        args.extend(["-vcodec", "png", "-i", "pipe:0"].map(OsString::from));
        args.extend(self.extra_args.iter().map(OsString::from));
        args.push(self.out_path.clone().into_os_string());
        args
    }
}

/// Sink that spawns the encoder and streams PNG-encoded frames into its stdin.
///
/// Writes block while the encoder's pipe buffer is full, so frame production is paced by the
/// encoder's consumption.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }

    pub fn opts(&self) -> &FfmpegSinkOpts {
        &self.opts
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> InbetweenResult<()> {
        cfg.validate()?;
        if self.child.is_some() {
            return Err(InbetweenError::busy("encoder already running"));
        }
        ensure_parent_dir(&self.opts.out_path)?;

        let mut cmd = Command::new(&self.opts.encoder);
        cmd.args(self.opts.args(cfg.fps))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        tracing::debug!(
            encoder = %self.opts.encoder.display(),
            out = %self.opts.out_path.display(),
            fps = cfg.fps,
            "spawning encoder"
        );
        let mut child = cmd.spawn().map_err(|e| {
            InbetweenError::encoder_process(format!(
                "failed to spawn '{}': {e}",
                self.opts.encoder.display()
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| InbetweenError::encoder_process("failed to open encoder stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| InbetweenError::encoder_process("failed to open encoder stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> InbetweenResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| InbetweenError::encoder_process("encoder sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(InbetweenError::validation(
                "encoder sink received out-of-order frame index",
            ));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(InbetweenError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.last_idx = Some(idx);

        let png = encode_png(frame)?;
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(InbetweenError::encoder_process(
                "encoder sink is already finalized",
            ));
        };

        use std::io::Write as _;
        stdin.write_all(&png).map_err(|e| {
            InbetweenError::encoder_process(format!("failed to write frame to encoder: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> InbetweenResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| InbetweenError::encoder_process("encoder sink not started"))?;
        self.cfg = None;

        let status = child.wait().map_err(|e| {
            InbetweenError::encoder_process(format!("failed to wait for encoder: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| InbetweenError::encoder_process("stderr drain thread panicked"))?
                .map_err(|e| {
                    InbetweenError::encoder_process(format!("encoder stderr read failed: {e}"))
                })?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(InbetweenError::encoder_process(format!(
                "encoder exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// PNG bytes of one straight-alpha frame.
pub fn encode_png(frame: &FrameRGBA) -> InbetweenResult<Vec<u8>> {
    frame.validate()?;
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| InbetweenError::validation("frame buffer does not match its size"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| InbetweenError::encoder_process(format!("png encode failed: {e}")))?;
    Ok(buf)
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> InbetweenResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `encoder -version` runs successfully.
pub fn is_encoder_available(encoder: &Path) -> bool {
    Command::new(encoder)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
