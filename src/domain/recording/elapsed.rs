//! Elapsed recording time value object

use std::fmt;

/// Elapsed time of the current recording, as reported by the recorder.
///
/// Rendered as `HH:MM:SS` where the minute field is the total number of
/// whole minutes, not minutes within the hour: one hour and two minutes
/// displays as `01:62:..`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct ElapsedTime {
    seconds: f64,
}

impl ElapsedTime {
    /// Zero elapsed time
    pub const ZERO: Self = Self { seconds: 0.0 };

    /// Create from fractional seconds. Negative and NaN inputs clamp to zero.
    pub fn from_secs_f64(seconds: f64) -> Self {
        let seconds = if seconds.is_finite() && seconds > 0.0 {
            seconds
        } else {
            0.0
        };
        Self { seconds }
    }

    /// Whole seconds (truncated)
    pub fn whole_secs(&self) -> u64 {
        self.seconds.trunc() as u64
    }

    /// Hour field of the readout
    pub fn hours(&self) -> u64 {
        self.whole_secs() / 3600
    }

    /// Minute field of the readout (not reduced modulo 60)
    pub fn minutes(&self) -> u64 {
        self.whole_secs() / 60
    }

    /// Second field of the readout
    pub fn seconds(&self) -> u64 {
        self.whole_secs() % 60
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_renders_all_zeroes() {
        assert_eq!(ElapsedTime::ZERO.to_string(), "00:00:00");
    }

    #[test]
    fn two_minutes_five_seconds() {
        let elapsed = ElapsedTime::from_secs_f64(125.0);
        assert_eq!(elapsed.to_string(), "00:02:05");
    }

    #[test]
    fn minutes_are_not_reduced_past_the_hour() {
        let elapsed = ElapsedTime::from_secs_f64(3725.0);
        assert_eq!(elapsed.hours(), 1);
        assert_eq!(elapsed.minutes(), 62);
        assert_eq!(elapsed.seconds(), 5);
        assert_eq!(elapsed.to_string(), "01:62:05");
    }

    #[test]
    fn fractional_seconds_truncate() {
        let elapsed = ElapsedTime::from_secs_f64(59.99);
        assert_eq!(elapsed.to_string(), "00:00:59");
    }

    #[test]
    fn negative_and_nan_clamp_to_zero() {
        assert_eq!(ElapsedTime::from_secs_f64(-3.0), ElapsedTime::ZERO);
        assert_eq!(ElapsedTime::from_secs_f64(f64::NAN), ElapsedTime::ZERO);
    }
}
