//! Static mapping from WMO weather codes to a label and an icon glyph.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

/// Human-facing description of a weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interpretation {
    pub label: &'static str,
    pub icon: &'static str,
}

const fn entry(label: &'static str, icon: &'static str) -> Interpretation {
    Interpretation { label, icon }
}

// Kept sorted by code so `lookup` can binary search.
static TABLE: [(i32, Interpretation); 16] = [
    (0, entry("Clear sky", "\u{2600}\u{fe0f}")),
    (1, entry("Mainly clear", "\u{1f324}\u{fe0f}")),
    (2, entry("Partly cloudy", "\u{26c5}")),
    (3, entry("Overcast", "\u{2601}\u{fe0f}")),
    (45, entry("Foggy", "\u{1f32b}\u{fe0f}")),
    (48, entry("Rime fog", "\u{1f32b}\u{fe0f}")),
    (51, entry("Light drizzle", "\u{1f326}\u{fe0f}")),
    (53, entry("Moderate drizzle", "\u{1f326}\u{fe0f}")),
    (55, entry("Dense drizzle", "\u{1f326}\u{fe0f}")),
    (61, entry("Slight rain", "\u{1f327}\u{fe0f}")),
    (63, entry("Moderate rain", "\u{1f327}\u{fe0f}")),
    (65, entry("Heavy rain", "\u{1f327}\u{fe0f}")),
    (71, entry("Slight snow", "\u{1f328}\u{fe0f}")),
    (73, entry("Moderate snow", "\u{1f328}\u{fe0f}")),
    (75, entry("Heavy snow", "\u{2744}\u{fe0f}")),
    (95, entry("Thunderstorm", "\u{26c8}\u{fe0f}")),
];

/// Look up a weather code. Codes outside the table yield `None`.
pub fn lookup(code: i32) -> Option<&'static Interpretation> {
    TABLE
        .binary_search_by_key(&code, |(c, _)| *c)
        .ok()
        .map(|idx| &TABLE[idx].1)
}

/// Label for `code`, or the literal `"unknown"` when the table has no entry.
pub fn label_or_unknown(code: i32) -> &'static str {
    lookup(code).map(|i| i.label).unwrap_or("unknown")
}

/// All known codes with their interpretation, in ascending code order.
pub fn entries() -> impl Iterator<Item = (i32, &'static Interpretation)> {
    TABLE.iter().map(|(code, interp)| (*code, interp))
}
