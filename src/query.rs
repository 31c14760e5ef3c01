//! Query string parameter-name extraction.

use std::collections::HashSet;

/// Extracts parameter names from a raw query string.
///
/// Names are taken lexically: the query is split on `&`, and each segment's
/// name is the substring before the first `=` (a bare segment without `=`
/// is itself a name). Repeated names count once. The extraction is total —
/// no query string can make it fail, so the parameter policy sees every
/// name that is present, including duplicates and otherwise unparseable
/// segments.
pub fn names(value: &str) -> HashSet<String> {
    value
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment
                .split_once('=')
                .map_or(segment, |(name, _)| name)
                .to_string()
        })
        .collect()
}
