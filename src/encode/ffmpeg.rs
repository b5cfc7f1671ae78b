use crate::encode::sink::{Frame, FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{SlidewaveError, SlidewaveResult};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Options for [`FfmpegSink`] video output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output video file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Video codec passed to `-c:v`.
    pub codec: String,
    /// Constant rate factor; `None` leaves the codec default.
    pub crf: Option<u8>,
    /// Encoder preset; `None` leaves the codec default.
    pub preset: Option<String>,
    /// Output pixel format passed to `-pix_fmt`.
    pub pix_fmt: String,
}

impl FfmpegSinkOpts {
    /// H.264 + yuv420p into `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            codec: "libx264".to_owned(),
            crf: Some(18),
            preset: Some("medium".to_owned()),
            pix_fmt: "yuv420p".to_owned(),
        }
    }

    fn is_x264(&self) -> bool {
        self.codec == "libx264"
    }

    /// Output-side arguments, everything after `-i pipe:0` except the path.
    pub(crate) fn output_args(&self) -> Vec<String> {
        let mut args = vec!["-an".to_owned(), "-c:v".to_owned(), self.codec.clone()];
        if let Some(preset) = &self.preset {
            args.extend(["-preset".to_owned(), preset.clone()]);
        }
        if let Some(crf) = self.crf {
            args.extend(["-crf".to_owned(), crf.to_string()]);
        }
        if self.is_x264() {
            // Slides hold still for most of their duration.
            args.extend(["-tune".to_owned(), "stillimage".to_owned()]);
        }
        args.extend([
            "-pix_fmt".to_owned(),
            self.pix_fmt.clone(),
            "-movflags".to_owned(),
            "+faststart".to_owned(),
        ]);
        args
    }

    fn needs_even_size(&self) -> bool {
        self.pix_fmt.starts_with("yuv420") || self.pix_fmt == "nv12"
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw frames to its stdin.
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

    fn validate_config(&self, cfg: &SinkConfig) -> SlidewaveResult<()> {
        cfg.fps.validate()?;
        if cfg.width == 0 || cfg.height == 0 {
            return Err(SlidewaveError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if self.opts.needs_even_size()
            && (!cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2))
        {
            return Err(SlidewaveError::validation(format!(
                "ffmpeg sink width/height must be even for pix_fmt '{}', got {}x{}",
                self.opts.pix_fmt, cfg.width, cfg.height
            )));
        }
        Ok(())
    }

    fn kill_child(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
        self.cfg = None;
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> SlidewaveResult<()> {
        if self.child.is_some() {
            return Err(SlidewaveError::evaluation("ffmpeg sink already started"));
        }
        self.validate_config(&cfg)?;

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(SlidewaveError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(SlidewaveError::resource(
                "ffmpeg is required for video encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if self.opts.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            cfg.format.ffmpeg_name(),
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);
        cmd.args(self.opts.output_args());
        cmd.arg(&self.opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            SlidewaveError::resource(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let Some(stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SlidewaveError::resource("failed to open ffmpeg stdin"));
        };
        let Some(mut stderr) = child.stderr.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SlidewaveError::resource("failed to open ffmpeg stderr"));
        };
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            path = %self.opts.out_path.display(),
            codec = %self.opts.codec,
            width = cfg.width,
            height = cfg.height,
            "ffmpeg started"
        );

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> SlidewaveResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| SlidewaveError::evaluation("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(SlidewaveError::evaluation(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        frame.check(cfg)?;
        self.last_idx = Some(idx);

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(SlidewaveError::evaluation("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&frame.data).map_err(|e| {
            SlidewaveError::resource(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> SlidewaveResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| SlidewaveError::evaluation("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            SlidewaveError::resource(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| SlidewaveError::evaluation("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| SlidewaveError::resource(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        self.cfg = None;
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(SlidewaveError::resource(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn abort(&mut self) {
        if self.child.is_some() {
            tracing::warn!(path = %self.opts.out_path.display(), "killing ffmpeg after failed render");
        }
        self.kill_child();
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        self.kill_child();
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // Rawvideo input rate goes before `-i`, as a rational.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> SlidewaveResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
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
