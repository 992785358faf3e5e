use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::encode::sink::FRAME_FILE_PATTERN;
use crate::foundation::error::{PaperdanceError, PaperdanceResult};

/// Constant-rate-factor for visually lossless H.264.
pub const X264_CRF: u32 = 17;
/// Fixed keyframe interval, neutral deblocking and no scene-cut keyframes.
pub const X264_PARAMS: &str = "keyint=25:deblock=0,0:scenecut=0";

/// Options for [`Mp4Encoder`] output.
#[derive(Clone, Debug)]
pub struct Mp4EncoderOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
}

impl Mp4EncoderOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Turns a directory of `f_00000.png`-style frames into an H.264/yuv420p MP4 with the system
/// `ffmpeg`.
#[derive(Clone, Debug)]
pub struct Mp4Encoder {
    opts: Mp4EncoderOpts,
}

impl Mp4Encoder {
    pub fn new(opts: Mp4EncoderOpts) -> Self {
        Self { opts }
    }

    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }

    /// Check encoder preconditions that do not depend on the frames themselves.
    pub fn check(&self, width: u32, height: u32, fps: u32) -> PaperdanceResult<()> {
        if fps == 0 {
            return Err(PaperdanceError::validation("fps must be non-zero"));
        }
        if width == 0 || height == 0 {
            return Err(PaperdanceError::validation(
                "mp4 width/height must be non-zero",
            ));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(PaperdanceError::validation(
                "mp4 width/height must be even (required for yuv420p output)",
            ));
        }
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(PaperdanceError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        Ok(())
    }

    /// Encode the frame sequence in `frames_dir` at `fps`.
    #[tracing::instrument(skip(self), fields(out = %self.opts.out_path.display()))]
    pub fn encode_dir(&self, frames_dir: &Path, fps: u32) -> PaperdanceResult<()> {
        if fps == 0 {
            return Err(PaperdanceError::validation("fps must be non-zero"));
        }
        if !is_ffmpeg_on_path() {
            return Err(PaperdanceError::encoding(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }
        ensure_parent_dir(&self.opts.out_path)?;

        let output = Command::new("ffmpeg")
            .args(ffmpeg_args(frames_dir, fps, &self.opts))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                PaperdanceError::encoding(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PaperdanceError::encoding(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        tracing::info!("mp4 written");
        Ok(())
    }
}

/// Full `ffmpeg` argument list for encoding `frames_dir` into `opts.out_path`.
pub fn ffmpeg_args(frames_dir: &Path, fps: u32, opts: &Mp4EncoderOpts) -> Vec<OsString> {
    let fps = fps.to_string();
    let crf = X264_CRF.to_string();
    let mut args: Vec<OsString> = Vec::with_capacity(40);
    args.push(if opts.overwrite { "-y" } else { "-n" }.into());
    args.extend(["-loglevel", "error", "-framerate", fps.as_str(), "-i"].map(OsString::from));
    args.push(frames_dir.join(FRAME_FILE_PATTERN).into_os_string());
    args.extend(
        [
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-r",
            fps.as_str(),
            "-crf",
            crf.as_str(),
            "-preset",
            "slow",
            "-profile:v",
            "high",
            "-level",
            "4.2",
            "-tune",
            "film",
            "-x264-params",
            X264_PARAMS,
            "-movflags",
            "+faststart",
        ]
        .map(OsString::from),
    );
    args.push(opts.out_path.clone().into_os_string());
    args
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> PaperdanceResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
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
