//! Per-host idle-gap timelines for insertion (active) scheduling.

/// A half-open idle interval `[start, end)` on a host timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleGap {
    /// Inclusive start of the idle interval.
    pub start: f64,
    /// Exclusive end; `f64::INFINITY` for the tail gap.
    pub end: f64,
}

impl ScheduleGap {
    /// Length of the gap in seconds.
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// The idle gaps of one host.
///
/// Starts as a single unbounded gap. Committing a placement splits the
/// containing gap in two; the surviving gaps keep their relative order and
/// new fragments are appended, so the set stays disjoint but unsorted.
#[derive(Debug, Clone)]
pub struct GapTimeline {
    gaps: Vec<ScheduleGap>,
}

impl Default for GapTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl GapTimeline {
    /// A fresh timeline: one gap covering `[0, +inf)`.
    pub fn new() -> Self {
        Self {
            gaps: vec![ScheduleGap {
                start: 0.0,
                end: f64::INFINITY,
            }],
        }
    }

    /// Earliest gap start that can hold `duration` seconds without
    /// starting before `ready`. A gap that straddles `ready` does not
    /// qualify; insertion only ever starts at a gap boundary.
    pub fn earliest_fit(&self, ready: f64, duration: f64) -> Option<f64> {
        self.gaps
            .iter()
            .filter(|g| g.start >= ready && duration <= g.length())
            .map(|g| g.start)
            .min_by(f64::total_cmp)
    }

    /// Commits the interval `[ast, eft)`, splitting the gap that contains
    /// it. Returns `false` when no gap contains the interval.
    pub fn commit(&mut self, ast: f64, eft: f64) -> bool {
        let Some(index) = self
            .gaps
            .iter()
            .position(|g| ast >= g.start && eft <= g.end)
        else {
            return false;
        };
        let gap = self.gaps.remove(index);
        if ast > gap.start {
            self.gaps.push(ScheduleGap {
                start: gap.start,
                end: ast,
            });
        }
        if eft < gap.end {
            self.gaps.push(ScheduleGap {
                start: eft,
                end: gap.end,
            });
        }
        true
    }

    /// Start of the latest gap, i.e. the time from which the host is
    /// continuously free. Used as the host-ready mark for standby energy.
    pub fn host_ready(&self) -> f64 {
        self.gaps
            .iter()
            .map(|g| g.start)
            .max_by(f64::total_cmp)
            .unwrap_or(0.0)
    }

    /// The current gap set, in internal order.
    pub fn gaps(&self) -> &[ScheduleGap] {
        &self.gaps
    }
}
