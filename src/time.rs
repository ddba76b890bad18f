//! Time abstraction traits for the host's monotonic clock.

/// Trait for abstracting the host's millisecond clock.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Clocks that wrap (e.g. a 32-bit millisecond counter) must account for
    /// the wrap here so that elapsed time stays monotonic.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}

/// Returns true when at least `millis` have passed between `earlier` and `now`.
#[inline]
pub(crate) fn has_elapsed<I: TimeInstant>(now: I, earlier: I, millis: u64) -> bool {
    now.duration_since(earlier).as_millis() >= millis
}
