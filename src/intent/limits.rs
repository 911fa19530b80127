use once_cell::sync::Lazy;
use regex::Regex;

/// Applied when no limit phrase matches. Acts as a safety cap on result
/// size; chosen policy, documented in DESIGN.md.
pub const DEFAULT_LIMIT: u64 = 100;

static LIMIT_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\btop\s+(\d+)\b",
        r"(?i)\bfirst\s+(\d+)\b",
        r"(?i)\blimit\s+(\d+)\b",
        r"(?i)\b(\d+)\s+results?\b",
        r"(?i)\bshow\s+(\d+)\b",
        r"(?i)\bonly\s+(\d+)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Detect a row limit from phrases like "top 5" or "first 10 results";
/// the first numeric match wins, `DEFAULT_LIMIT` otherwise.
pub fn detect_limit(text: &str) -> u64 {
    for re in LIMIT_RES.iter() {
        if let Some(caps) = re.captures(text) {
            if let Ok(n) = caps[1].parse::<u64>() {
                return n;
            }
        }
    }
    DEFAULT_LIMIT
}
