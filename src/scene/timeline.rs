use crate::foundation::core::{Fps, FrameIndex};
use crate::scene::model::{Phase, Show};

/// How phase durations are turned into frame counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameAllocation {
    /// `round(duration_ms * fps / 1000)` for every phase independently.
    #[default]
    PerPhase,
    /// Ceil every phase, then trim round-robin so the show total is
    /// `round(total_ms * fps / 1000)`.
    Distributed,
}

/// Frame layout of one slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlidePlan {
    pub index: usize,
    /// First frame of the slide in show time.
    pub start: FrameIndex,
    /// Frame counts for in, hold and out.
    pub frames: [u64; 3],
}

impl SlidePlan {
    pub fn frames_in(&self, phase: Phase) -> u64 {
        self.frames[phase_slot(phase)]
    }

    pub fn total_frames(&self) -> u64 {
        self.frames.iter().sum()
    }

    pub fn end(&self) -> FrameIndex {
        FrameIndex(self.start.0 + self.total_frames())
    }
}

/// Per-slide frame counts for a whole show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timeline {
    slides: Vec<SlidePlan>,
}

impl Timeline {
    pub fn plan(show: &Show, allocation: FrameAllocation) -> Self {
        let durations: Vec<u64> = show
            .slides
            .iter()
            .flat_map(|s| Phase::ALL.map(|p| s.effect(p).duration_ms))
            .collect();
        let counts = match allocation {
            FrameAllocation::PerPhase => durations
                .iter()
                .map(|&ms| show.fps.frames_for_ms_round(ms))
                .collect(),
            FrameAllocation::Distributed => distribute_frames_ceil_adjust(show.fps, &durations),
        };

        let mut start = 0u64;
        let slides = counts
            .chunks_exact(3)
            .enumerate()
            .map(|(index, c)| {
                let plan = SlidePlan {
                    index,
                    start: FrameIndex(start),
                    frames: [c[0], c[1], c[2]],
                };
                start += plan.total_frames();
                plan
            })
            .collect();
        Self { slides }
    }

    pub fn slides(&self) -> &[SlidePlan] {
        &self.slides
    }

    pub fn slide(&self, index: usize) -> Option<&SlidePlan> {
        self.slides.get(index)
    }

    pub fn total_frames(&self) -> u64 {
        self.slides.last().map_or(0, |s| s.end().0)
    }
}

fn phase_slot(phase: Phase) -> usize {
    match phase {
        Phase::In => 0,
        Phase::Hold => 1,
        Phase::Out => 2,
    }
}

/// Progress of frame `k` in an `n`-frame phase; both endpoints are sampled.
pub fn phase_progress(k: u64, n: u64) -> f64 {
    let denom = n.saturating_sub(1).max(1);
    (k as f64 / denom as f64).clamp(0.0, 1.0)
}

/// Ceil each segment, then add or remove frames round-robin until the total matches
/// `round(sum(ms) * fps / 1000)`. Non-empty segments never drop below one frame and
/// zero-length segments stay empty.
pub fn distribute_frames_ceil_adjust(fps: Fps, durations_ms: &[u64]) -> Vec<u64> {
    let mut frames: Vec<u64> = durations_ms
        .iter()
        .map(|&ms| fps.frames_for_ms_ceil(ms))
        .collect();
    let total_ms: u64 = durations_ms.iter().sum();
    let target = fps.frames_for_ms_round(total_ms);
    let mut current: u64 = frames.iter().sum();

    while current > target {
        let mut changed = false;
        for f in frames.iter_mut() {
            if current == target {
                break;
            }
            if *f > 1 {
                *f -= 1;
                current -= 1;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    while current < target {
        let mut changed = false;
        for (f, &ms) in frames.iter_mut().zip(durations_ms) {
            if current == target {
                break;
            }
            if ms > 0 {
                *f += 1;
                current += 1;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    frames
}

#[cfg(test)]
#[path = "../../tests/unit/scene/timeline.rs"]
mod tests;
