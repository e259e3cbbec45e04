/// Shared utility functions for the forecast sync service
///
/// Truncate a string to at most `max_chars` characters
///
/// Used to keep response bodies and tokens short in log lines. Cuts on a
/// character boundary, so multi-byte text is never split.
///
/// # Examples
///
/// ```
/// use forecast_sync::utils::truncate;
///
/// assert_eq!(truncate("abcdef", 3), "abc");
/// assert_eq!(truncate("abc", 10), "abc");
/// assert_eq!(truncate("24°C", 3), "24°");
/// ```
pub fn truncate(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
