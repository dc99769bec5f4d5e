// ABOUTME: Duration rendering for podcast episode lengths.
// ABOUTME: Converts millisecond counts into zero-padded MM:SS or HH:MM:SS strings.

/// Renders a millisecond count as `HH:MM:SS` when at least one hour long, otherwise `MM:SS`.
///
/// Sub-second remainders are truncated.
pub fn format_duration(duration_ms: u64) -> String {
    let total = duration_ms / 1000;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
