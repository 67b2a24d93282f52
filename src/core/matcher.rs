use crate::core::distance::distance;
use crate::core::error::{EmptySetError, SetRole};
use crate::models::{Coordinate, MatchRecord};

/// Result of one matching run
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub matches: Vec<MatchRecord>,
    pub comparisons: usize,
}

impl MatchResult {
    /// Records that found a target point
    pub fn matched_count(&self) -> usize {
        self.matches.iter().filter(|m| m.is_matched()).count()
    }

    /// Mean distance over matched records, `None` if nothing matched
    pub fn mean_distance_km(&self) -> Option<f64> {
        let matched: Vec<f64> = self
            .matches
            .iter()
            .filter(|m| m.is_matched())
            .map(|m| m.distance_km)
            .collect();

        if matched.is_empty() {
            None
        } else {
            Some(matched.iter().sum::<f64>() / matched.len() as f64)
        }
    }

    /// Largest distance over matched records
    pub fn max_distance_km(&self) -> Option<f64> {
        self.matches
            .iter()
            .filter(|m| m.is_matched())
            .map(|m| m.distance_km)
            .fold(None, |max, d| Some(max.map_or(d, |m: f64| m.max(d))))
    }
}

/// Nearest-neighbour matcher over two coordinate sets
///
/// Brute force: every source point is compared against every target
/// point. Holds no state between runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher;

impl Matcher {
    pub fn new() -> Self {
        Self
    }

    /// Match every source point to its nearest target point
    ///
    /// # Returns
    /// MatchResult with one record per source point, in source order
    pub fn find_matches(&self, source: &[Coordinate], target: &[Coordinate]) -> MatchResult {
        tracing::debug!(
            "Matching {} source points against {} target points",
            source.len(),
            target.len()
        );

        let matches = match_all(source, target);
        let comparisons = source.len() * target.len();

        tracing::trace!("Completed {} distance evaluations", comparisons);

        MatchResult {
            matches,
            comparisons,
        }
    }
}

/// For each source point, find the closest target point
///
/// Output has exactly `source.len()` records. Ties go to the lowest
/// target index. With an empty target every record is unmatched and its
/// distance is infinite.
pub fn match_all(source: &[Coordinate], target: &[Coordinate]) -> Vec<MatchRecord> {
    source
        .iter()
        .enumerate()
        .map(|(source_index, point)| {
            let mut best: Option<(usize, f64)> = None;

            for (j, candidate) in target.iter().enumerate() {
                let d = distance(point, candidate);
                // strict comparison keeps the first of equal distances
                if best.map_or(true, |(_, min)| d < min) {
                    best = Some((j, d));
                }
            }

            MatchRecord {
                source_index,
                source: *point,
                target_index: best.map(|(j, _)| j),
                matched: best.map(|(j, _)| target[j]),
                distance_km: best.map_or(f64::INFINITY, |(_, d)| d),
            }
        })
        .collect()
}

/// Refuse degenerate input, for callers that want that policy
pub fn ensure_non_empty(source: &[Coordinate], target: &[Coordinate]) -> Result<(), EmptySetError> {
    if source.is_empty() {
        return Err(EmptySetError { set: SetRole::Source });
    }
    if target.is_empty() {
        return Err(EmptySetError { set: SetRole::Target });
    }
    Ok(())
}
