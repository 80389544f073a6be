//! Location → region bucketing.
//!
//! Rules are evaluated top to bottom against the lowercased location and the
//! first match wins. Locations that match nothing keep their raw text.

/// (substring, region). Order matters: "remote" must win over any place name,
/// and Canada must be checked before the ", ca" state suffix.
const REGION_RULES: &[(&str, &str)] = &[
    ("remote", "Remote"),
    ("anywhere", "Remote"),
    ("toronto", "Canada"),
    ("vancouver", "Canada"),
    ("canada", "Canada"),
    ("san francisco", "US West"),
    ("seattle", "US West"),
    ("los angeles", "US West"),
    ("california", "US West"),
    (", ca", "US West"),
    ("new york", "US East"),
    ("boston", "US East"),
    ("washington, dc", "US East"),
    (", ny", "US East"),
    ("chicago", "US Central"),
    ("austin", "US Central"),
    ("denver", "US Central"),
    ("united states", "US"),
    ("usa", "US"),
    ("london", "Europe"),
    ("dublin", "Europe"),
    ("paris", "Europe"),
    ("berlin", "Europe"),
    ("amsterdam", "Europe"),
    ("europe", "Europe"),
    ("emea", "Europe"),
    ("singapore", "Asia Pacific"),
    ("tokyo", "Asia Pacific"),
    ("sydney", "Asia Pacific"),
    ("bangalore", "Asia Pacific"),
    ("apac", "Asia Pacific"),
];

/// Map a free-form location to a coarse region
pub fn categorize_location(location: &str) -> &str {
    let lowered = location.to_lowercase();
    REGION_RULES
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, region)| *region)
        .unwrap_or(location)
}
