//! Conversion between focus durations and their editable text form.
//!
//! Durations are whole seconds. The display form is `MM:SS` below one hour
//! and `HH:MM:SS` from one hour on. Decoding accepts one, two or three
//! colon-separated fields and never fails: unreadable fields count as zero,
//! and any other field count falls back to [`DEFAULT_FOCUS_SECONDS`].

/// Default focus duration for a freshly created step (25 minutes).
pub const DEFAULT_FOCUS_SECONDS: u32 = 25 * 60;

const SECONDS_PER_HOUR: u32 = 3600;
const SECONDS_PER_MINUTE: u32 = 60;

/// Formats a duration as `MM:SS`, or `HH:MM:SS` once it reaches an hour.
///
/// ```rust
/// use noisegate_core::time_codec::encode;
///
/// assert_eq!(encode(1500), "25:00");
/// assert_eq!(encode(3723), "01:02:03");
/// ```
pub fn encode(seconds: u32) -> String {
    let (h, m, s) = split(seconds);
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Formats a duration as `HH:MM:SS` regardless of its size.
///
/// This is the text offered to the user when they start editing a step's
/// remaining time.
pub fn encode_for_input(seconds: u32) -> String {
    let (h, m, s) = split(seconds);
    format!("{h:02}:{m:02}:{s:02}")
}

/// Parses user-entered text into a duration in seconds.
///
/// ```rust
/// use noisegate_core::time_codec::{decode, DEFAULT_FOCUS_SECONDS};
///
/// assert_eq!(decode("01:02:03"), 3723);
/// assert_eq!(decode("25:00"), 1500);
/// assert_eq!(decode("90"), 90);
/// assert_eq!(decode("ab:10"), 10);
/// assert_eq!(decode("1:2:3:4"), DEFAULT_FOCUS_SECONDS);
/// ```
pub fn decode(text: &str) -> u32 {
    let fields: Vec<u32> = text.split(':').map(parse_field).collect();

    match fields.as_slice() {
        [s] => *s,
        [m, s] => m.saturating_mul(SECONDS_PER_MINUTE).saturating_add(*s),
        [h, m, s] => h
            .saturating_mul(SECONDS_PER_HOUR)
            .saturating_add(m.saturating_mul(SECONDS_PER_MINUTE))
            .saturating_add(*s),
        _ => DEFAULT_FOCUS_SECONDS,
    }
}

fn split(seconds: u32) -> (u32, u32, u32) {
    (
        seconds / SECONDS_PER_HOUR,
        (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
        seconds % SECONDS_PER_MINUTE,
    )
}

/// Reads the leading decimal integer of a field, `0` when there is none.
///
/// A leading minus sign is accepted but the value clamps to zero, and
/// values too large for `u32` saturate.
fn parse_field(field: &str) -> u32 {
    let field = field.trim();
    let (negative, digits) = match field.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, field.strip_prefix('+').unwrap_or(field)),
    };

    let value = digits
        .chars()
        .take_while(char::is_ascii_digit)
        .fold(0u32, |acc, c| {
            acc.saturating_mul(10)
                .saturating_add(c.to_digit(10).unwrap_or(0))
        });

    if negative {
        0
    } else {
        value
    }
}
