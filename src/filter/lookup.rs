//! Preset lookup by exact pattern text.

/// Returns the name of the first preset whose pattern equals `pattern`
/// byte-for-byte.
///
/// `presets` is any sequence of `(name, pattern)` pairs; scan order decides
/// which name wins when several presets share a pattern.
///
/// # Examples
///
/// ```
/// use seerr_settings::filter::find_preset_for_pattern;
///
/// let presets = [("HD", "1080p.*"), ("UHD", "2160p.*")];
/// assert_eq!(find_preset_for_pattern("2160p.*", presets), Some("UHD"));
/// assert_eq!(find_preset_for_pattern("2160p", presets), None);
/// ```
pub fn find_preset_for_pattern<I, K, V>(pattern: &str, presets: I) -> Option<K>
where
    I: IntoIterator<Item = (K, V)>,
    V: AsRef<str>,
{
    presets
        .into_iter()
        .find(|(_, preset_pattern)| preset_pattern.as_ref() == pattern)
        .map(|(name, _)| name)
}

/// Returns the preset name matching a whole priority list.
///
/// Presets name single patterns, so only a one-element list can match;
/// empty and multi-pattern lists always yield `None`.
///
/// # Examples
///
/// ```
/// use seerr_settings::filter::match_sequence_to_preset_name;
///
/// let presets = [("HD", "1080p.*")];
/// assert_eq!(match_sequence_to_preset_name(&["1080p.*"], presets), Some("HD"));
/// assert_eq!(match_sequence_to_preset_name(&["1080p.*", "720p.*"], presets), None);
/// ```
pub fn match_sequence_to_preset_name<S, I, K, V>(patterns: &[S], presets: I) -> Option<K>
where
    S: AsRef<str>,
    I: IntoIterator<Item = (K, V)>,
    V: AsRef<str>,
{
    match patterns {
        [single] => find_preset_for_pattern(single.as_ref(), presets),
        _ => None,
    }
}
