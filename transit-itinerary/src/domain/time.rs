//! Time handling for search labels.
//!
//! The path search reports times as milliseconds since the Unix epoch and
//! the timetable reports delays as whole seconds. This module converts both
//! into `chrono` values, failing instead of panicking when a value falls
//! outside the range `chrono` can represent.

use chrono::{DateTime, Duration, Utc};

/// Error returned when a search time cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    /// Epoch milliseconds outside the representable range
    #[error("timestamp out of range: {0} ms")]
    OutOfRange(i64),

    /// Applying a delay overflowed the representable range
    #[error("delay of {delay_secs} s overflows timestamp {base}")]
    DelayOverflow { base: DateTime<Utc>, delay_secs: i64 },

    /// Moving a leg by its duration overflowed the representable range
    #[error("shifting {base} by {shift_ms} ms overflows")]
    ShiftOverflow { base: DateTime<Utc>, shift_ms: i64 },
}

/// Converts epoch milliseconds from a search label into a UTC timestamp.
///
/// # Examples
///
/// ```
/// use transit_itinerary::domain::time::from_epoch_millis;
///
/// let t = from_epoch_millis(120_000).unwrap();
/// assert_eq!(t.timestamp_millis(), 120_000);
/// assert_eq!(t.to_rfc3339(), "1970-01-01T00:02:00+00:00");
///
/// assert!(from_epoch_millis(i64::MAX).is_err());
/// ```
pub fn from_epoch_millis(millis: i64) -> Result<DateTime<Utc>, TimeError> {
    DateTime::from_timestamp_millis(millis).ok_or(TimeError::OutOfRange(millis))
}

/// Shifts a planned time by a realtime delay given in seconds.
///
/// Negative delays (running early) move the time backwards.
pub fn apply_delay(planned: DateTime<Utc>, delay_secs: i64) -> Result<DateTime<Utc>, TimeError> {
    Duration::try_seconds(delay_secs)
        .and_then(|delay| planned.checked_add_signed(delay))
        .ok_or(TimeError::DelayOverflow {
            base: planned,
            delay_secs,
        })
}

/// Serializes a `chrono::Duration` as whole milliseconds.
pub(crate) mod millis {
    use chrono::Duration;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(duration.num_milliseconds())
    }
}
