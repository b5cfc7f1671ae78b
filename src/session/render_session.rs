use crate::assets::image::ImageSource;
use crate::effects::{Effect, EffectRegistry};
use crate::encode::sink::{Frame, FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, Size};
use crate::foundation::error::{SlidewaveError, SlidewaveResult};
use crate::render::renderer::FrameRenderer;
use crate::scene::model::{Phase, Show};
use crate::scene::timeline::{FrameAllocation, SlidePlan, Timeline};
use crate::stage::canvas::{Canvas, PixelFormat};
use std::sync::{Arc, mpsc};
use std::time::Instant;

/// Options controlling [`RenderSession`] behavior.
#[derive(Clone, Debug)]
pub struct RenderSessionOpts {
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Hand frames to the sink on a dedicated thread instead of inline.
    pub pipelined: bool,
    /// Bounded channel capacity between the renderer and the sink thread.
    pub channel_capacity: usize,
    /// How phase durations become frame counts.
    pub frame_allocation: FrameAllocation,
    /// Byte layout handed to the sink.
    pub pixel_format: PixelFormat,
}

impl Default for RenderSessionOpts {
    fn default() -> Self {
        Self {
            threads: None,
            pipelined: true,
            channel_capacity: 4,
            frame_allocation: FrameAllocation::PerPhase,
            pixel_format: PixelFormat::Rgb24,
        }
    }
}

impl RenderSessionOpts {
    pub fn validate(&self) -> SlidewaveResult<()> {
        if self.threads == Some(0) {
            return Err(SlidewaveError::validation("'threads' must be >= 1 when set"));
        }
        if self.channel_capacity == 0 {
            return Err(SlidewaveError::validation("'channel_capacity' must be >= 1"));
        }
        Ok(())
    }
}

/// Render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Slides with at least one frame.
    pub slides_rendered: usize,
    /// Slides skipped because every phase had zero frames.
    pub slides_skipped: usize,
}

/// A validated show with every effect resolved and every frame count planned.
///
/// Construction front-loads all configuration errors; rendering only fails on missing images,
/// sink errors or internal faults.
pub struct RenderSession {
    show: Show,
    size: Size,
    timeline: Timeline,
    effects: Vec<[Effect; 3]>,
    source: Arc<dyn ImageSource>,
    opts: RenderSessionOpts,
}

impl std::fmt::Debug for RenderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSession")
            .field("size", &self.size)
            .field("timeline", &self.timeline)
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl RenderSession {
    /// Build a session using the built-in effect registry.
    pub fn new(
        show: Show,
        source: Arc<dyn ImageSource>,
        opts: RenderSessionOpts,
    ) -> SlidewaveResult<Self> {
        Self::with_registry(show, source, opts, EffectRegistry::global())
    }

    #[tracing::instrument(skip_all, fields(slides = show.slides.len()))]
    pub fn with_registry(
        show: Show,
        source: Arc<dyn ImageSource>,
        opts: RenderSessionOpts,
        registry: &EffectRegistry,
    ) -> SlidewaveResult<Self> {
        show.validate()?;
        opts.validate()?;
        let size = show.size()?;

        let effects = show
            .slides
            .iter()
            .enumerate()
            .map(|(i, slide)| -> SlidewaveResult<[Effect; 3]> {
                let resolve = |phase: Phase| {
                    registry
                        .resolve(phase, slide.effect(phase))
                        .map_err(|e| e.in_slide(i, phase))
                };
                Ok([
                    resolve(Phase::In)?,
                    resolve(Phase::Hold)?,
                    resolve(Phase::Out)?,
                ])
            })
            .collect::<SlidewaveResult<Vec<_>>>()?;

        let timeline = Timeline::plan(&show, opts.frame_allocation);
        tracing::debug!(
            width = size.width,
            height = size.height,
            frames = timeline.total_frames(),
            "session ready"
        );
        Ok(Self {
            show,
            size,
            timeline,
            effects,
            source,
            opts,
        })
    }

    pub fn show(&self) -> &Show {
        &self.show
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn total_frames(&self) -> u64 {
        self.timeline.total_frames()
    }

    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            width: self.size.width,
            height: self.size.height,
            fps: self.show.fps,
            format: self.opts.pixel_format,
        }
    }

    /// Render frame `frame` of slide `slide` (slide-local index).
    pub fn render_frame(&self, slide: usize, frame: u64) -> SlidewaveResult<Canvas> {
        let plan = self.timeline.slide(slide).ok_or_else(|| {
            SlidewaveError::validation(format!(
                "slide {slide} is out of range (show has {})",
                self.timeline.slides().len()
            ))
        })?;
        if frame >= plan.total_frames() {
            return Err(SlidewaveError::validation(format!(
                "frame {frame} is out of range (slide {slide} has {} frames)",
                plan.total_frames()
            )));
        }

        let pool = build_thread_pool(self.opts.threads)?;
        pool.install(|| {
            let mut renderer = FrameRenderer::new(self.size, self.show.background);
            let image = self.load_image(plan)?;
            let mut frames = renderer.slide(plan, self.effects[plan.index], image)?;
            frames.skip_frames(frame);
            frames
                .next_frame()?
                .cloned()
                .ok_or_else(|| SlidewaveError::evaluation("slide ended before the requested frame"))
        })
    }

    /// Render the whole show into `sink` in frame order.
    ///
    /// On failure the sink is aborted and the first error is returned.
    pub fn render(&self, sink: &mut dyn FrameSink) -> SlidewaveResult<RenderStats> {
        self.render_with_progress(sink, &mut |_, _| {})
    }

    /// Like [`render`](Self::render), calling `progress(done, total)` after every frame the
    /// sink accepts. In pipelined mode the callback runs on the sink thread.
    #[tracing::instrument(skip_all, fields(frames = self.total_frames(), pipelined = self.opts.pipelined))]
    pub fn render_with_progress(
        &self,
        sink: &mut dyn FrameSink,
        progress: &mut (dyn FnMut(u64, u64) + Send),
    ) -> SlidewaveResult<RenderStats> {
        let started = Instant::now();
        let pool = build_thread_pool(self.opts.threads)?;
        let cfg = self.sink_config();

        let res = if self.opts.pipelined {
            self.render_pipelined(&pool, cfg, sink, progress)
        } else {
            self.render_sequential(&pool, cfg, sink, progress)
        };

        match res {
            Ok(stats) => {
                tracing::info!(
                    frames = stats.frames_total,
                    slides = stats.slides_rendered,
                    skipped = stats.slides_skipped,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "render finished"
                );
                Ok(stats)
            }
            Err(e) => {
                tracing::warn!(error = %e, "render failed, aborting sink");
                sink.abort();
                Err(e)
            }
        }
    }

    fn render_sequential(
        &self,
        pool: &rayon::ThreadPool,
        cfg: SinkConfig,
        sink: &mut dyn FrameSink,
        progress: &mut (dyn FnMut(u64, u64) + Send),
    ) -> SlidewaveResult<RenderStats> {
        sink.begin(cfg)?;
        let total = self.total_frames();
        let mut frame = Frame::new(cfg.width, cfg.height, cfg.format);
        let mut pushed = 0u64;
        let stats = pool.install(|| {
            self.produce(|slot, canvas| {
                canvas.write_bytes(cfg.format, &mut frame.data);
                sink.push_frame(slot.idx, &frame)
                    .map_err(|e| e.in_slide(slot.slide, slot.phase))?;
                pushed += 1;
                progress(pushed, total);
                Ok(())
            })
        })?;
        sink.end()?;
        Ok(stats)
    }

    fn render_pipelined(
        &self,
        pool: &rayon::ThreadPool,
        cfg: SinkConfig,
        sink: &mut dyn FrameSink,
        progress: &mut (dyn FnMut(u64, u64) + Send),
    ) -> SlidewaveResult<RenderStats> {
        let expected = self.total_frames();
        let cap = self.opts.channel_capacity.max(1);

        std::thread::scope(|scope| -> SlidewaveResult<RenderStats> {
            let (tx, rx) = mpsc::sync_channel::<FrameMsg>(cap);
            // Spent buffers flow back so at most `cap + 2` frames are ever allocated.
            let (ret_tx, ret_rx) = mpsc::channel::<Vec<u8>>();

            let enc = scope.spawn(move || -> SlidewaveResult<()> {
                sink.begin(cfg)?;
                let mut pushed = 0u64;
                while let Ok(FrameMsg { slot, frame }) = rx.recv() {
                    sink.push_frame(slot.idx, &frame)
                        .map_err(|e| e.in_slide(slot.slide, slot.phase))?;
                    pushed += 1;
                    progress(pushed, expected);
                    let _ = ret_tx.send(frame.data);
                }
                if pushed != expected {
                    return Err(SlidewaveError::evaluation(format!(
                        "renderer stopped after {pushed} of {expected} frames"
                    )));
                }
                sink.end()
            });

            let produce_res = pool.install(move || {
                self.produce(|slot, canvas| {
                    let mut data = ret_rx.try_recv().unwrap_or_default();
                    canvas.write_bytes(cfg.format, &mut data);
                    let frame = Frame {
                        width: cfg.width,
                        height: cfg.height,
                        format: cfg.format,
                        data,
                    };
                    tx.send(FrameMsg { slot, frame })
                        .map_err(|_| SlidewaveError::evaluation(SINK_GONE))
                })
            });

            let enc_res = enc
                .join()
                .map_err(|_| SlidewaveError::evaluation("sink thread panicked"))?;

            match produce_res {
                // The sink thread's own error explains why it stopped accepting frames.
                Err(e) if is_sink_gone(&e) => Err(enc_res.err().unwrap_or(e)),
                Err(e) => Err(e),
                Ok(stats) => enc_res.map(|()| stats),
            }
        })
    }

    /// Render every frame in order, handing each canvas to `emit`.
    fn produce(
        &self,
        mut emit: impl FnMut(FrameSlot, &Canvas) -> SlidewaveResult<()>,
    ) -> SlidewaveResult<RenderStats> {
        let mut renderer = FrameRenderer::new(self.size, self.show.background);
        let mut stats = RenderStats::default();

        for plan in self.timeline.slides() {
            if plan.total_frames() == 0 {
                tracing::debug!(slide = plan.index, "slide has no frames, skipping");
                stats.slides_skipped += 1;
                continue;
            }
            tracing::debug!(
                slide = plan.index,
                image = %self.show.slides[plan.index].image,
                frames = plan.total_frames(),
                "slide start"
            );

            let image = self.load_image(plan)?;
            let mut frames = renderer.slide(plan, self.effects[plan.index], image)?;
            let mut idx = plan.start.0;
            while let Some((phase, _)) = frames.position() {
                let slide = frames.slide_index();
                let Some(canvas) = frames.next_frame()? else {
                    break;
                };
                emit(
                    FrameSlot {
                        idx: FrameIndex(idx),
                        slide,
                        phase,
                    },
                    canvas,
                )?;
                idx += 1;
            }
            stats.frames_total += idx - plan.start.0;
            stats.slides_rendered += 1;
        }
        Ok(stats)
    }

    fn load_image(&self, plan: &SlidePlan) -> SlidewaveResult<image::RgbImage> {
        let id = &self.show.slides[plan.index].image;
        self.source
            .load(id)
            .map_err(|e| e.in_slide(plan.index, Phase::In))
    }
}

/// Where a frame sits in the show, for error context.
#[derive(Clone, Copy, Debug)]
struct FrameSlot {
    idx: FrameIndex,
    slide: usize,
    phase: Phase,
}

#[derive(Debug)]
struct FrameMsg {
    slot: FrameSlot,
    frame: Frame,
}

const SINK_GONE: &str = "sink thread is not accepting frames";

fn is_sink_gone(e: &SlidewaveError) -> bool {
    matches!(e, SlidewaveError::Evaluation(msg) if msg == SINK_GONE)
}

fn build_thread_pool(threads: Option<usize>) -> SlidewaveResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SlidewaveError::validation("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SlidewaveError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
