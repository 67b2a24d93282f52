use crate::core::{round_km, MatchResult, MAX_DISPLAY_PRECISION};
use crate::models::{MatchRecord, RejectedEntry};

/// Maps a set position to the number shown to the user, e.g. a CSV row
pub type Label<'a> = &'a dyn Fn(usize) -> usize;

/// Render one line per source point
pub fn render_matches(
    records: &[MatchRecord],
    precision: u32,
    source_label: Label<'_>,
    target_label: Label<'_>,
) -> String {
    let precision = precision.min(MAX_DISPLAY_PRECISION);
    let mut out = String::new();

    for record in records {
        let source = format!(
            "#{} ({}, {})",
            source_label(record.source_index),
            record.source.latitude(),
            record.source.longitude()
        );

        let line = match (record.matched, record.target_index) {
            (Some(matched), Some(target_index)) => format!(
                "{source} -> #{} ({}, {}) {:.*} km\n",
                target_label(target_index),
                matched.latitude(),
                matched.longitude(),
                precision as usize,
                round_km(record.distance_km, precision)
            ),
            _ => format!("{source} -> no target points\n"),
        };
        out.push_str(&line);
    }

    out
}

/// One-line summary of a run
pub fn render_summary(result: &MatchResult, precision: u32) -> String {
    let p = precision.min(MAX_DISPLAY_PRECISION) as usize;
    match (result.mean_distance_km(), result.max_distance_km()) {
        (Some(mean), Some(max)) => format!(
            "{} of {} points matched, mean {:.*} km, max {:.*} km",
            result.matched_count(),
            result.matches.len(),
            p,
            mean,
            p,
            max
        ),
        _ => format!("0 of {} points matched", result.matches.len()),
    }
}

/// List skipped entries with their original text
pub fn render_rejected(set_name: &str, rejected: &[RejectedEntry], label: Label<'_>) -> String {
    rejected
        .iter()
        .map(|entry| {
            format!(
                "skipped {set_name} entry #{} '{}': {}\n",
                label(entry.index),
                entry.raw,
                entry.error
            )
        })
        .collect()
}
