//! Wall-clock to animation progress.

/// Position within a two-phase transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PhaseProgress {
    /// Global progress below one half; cells are being drawn.
    First(f64),
    /// Global progress at or past one half; cells are being cleared.
    Second(f64),
}

impl PhaseProgress {
    pub fn phase(&self) -> u8 {
        match self {
            PhaseProgress::First(_) => 1,
            PhaseProgress::Second(_) => 2,
        }
    }

    pub fn value(&self) -> f64 {
        match *self {
            PhaseProgress::First(p) | PhaseProgress::Second(p) => p,
        }
    }
}

/// Maps timestamps (milliseconds, any monotonic origin) to `[0, 1]` progress
/// relative to a fixed start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressClock {
    start_ms: f64,
    duration_ms: f64,
}

impl ProgressClock {
    pub fn new(start_ms: f64, duration_ms: f64) -> Self {
        Self {
            start_ms,
            duration_ms,
        }
    }

    pub fn start_ms(&self) -> f64 {
        self.start_ms
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// `clamp((now - start) / duration, 0, 1)`. A non-positive duration is
    /// already finished.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if !(self.duration_ms > 0.0) {
            return 1.0;
        }
        let p = (now_ms - self.start_ms) / self.duration_ms;
        if p.is_nan() {
            return 0.0;
        }
        p.clamp(0.0, 1.0)
    }

    /// Split global progress into two equal phases, each rescaled to `[0, 1]`.
    pub fn phase_progress(&self, now_ms: f64) -> PhaseProgress {
        split_phases(self.progress(now_ms))
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

pub(crate) fn split_phases(progress: f64) -> PhaseProgress {
    if progress < 0.5 {
        PhaseProgress::First(progress * 2.0)
    } else {
        PhaseProgress::Second(((progress - 0.5) * 2.0).min(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_is_finished() {
        let clock = ProgressClock::new(10.0, 0.0);
        assert_eq!(clock.progress(10.0), 1.0);
    }

    #[test]
    fn clock_before_start_reads_zero() {
        let clock = ProgressClock::new(100.0, 300.0);
        assert_eq!(clock.progress(40.0), 0.0);
    }

    #[test]
    fn phase_boundary_belongs_to_second_phase() {
        assert_eq!(split_phases(0.5), PhaseProgress::Second(0.0));
        assert_eq!(split_phases(0.25), PhaseProgress::First(0.5));
        assert_eq!(split_phases(1.0), PhaseProgress::Second(1.0));
    }
}
