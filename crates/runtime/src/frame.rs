use foundation::time::Time;

/// Per-tick frame metadata.
///
/// `time` comes from the host's animation clock, so cadence follows the
/// display refresh rather than a fixed timer. `dt_s` is therefore variable
/// and zero on the first frame of a run.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based index within the current run of the loop.
    pub index: u64,
    /// Host time at the start of the frame.
    pub time: Time,
    /// Seconds since the previous frame of this run.
    pub dt_s: f64,
}

impl Frame {
    pub fn first(now: Time) -> Self {
        Self {
            index: 0,
            time: now,
            dt_s: 0.0,
        }
    }

    /// The successor frame at host time `now`. A clock that runs backwards
    /// (host timer reset) yields dt of zero rather than a negative step.
    pub fn next(self, now: Time) -> Self {
        Self {
            index: self.index + 1,
            time: now,
            dt_s: (now.0 - self.time.0).max(0.0),
        }
    }
}
