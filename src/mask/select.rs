use log::{debug, warn};

use crate::geometry::Rect;
use crate::models::TextDetection;

/// Result of the containment search over a candidate set.
#[derive(Debug, Clone, PartialEq)]
pub enum Containment {
    /// Largest pairwise union whose area ratio stays under the limit.
    Union { rect: Rect, pct: f64 },
    /// No pair qualified. `keep` holds the candidate indices closest to
    /// the origin, `erase` everything else.
    Fallback { keep: Vec<usize>, erase: Vec<usize> },
}

/// Index of the candidate with the largest box area. Strict comparison:
/// the first of equally-large boxes wins.
pub fn largest_candidate(candidates: &[TextDetection]) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let area = candidate.rect.area();
        if best.is_none_or(|(_, best_area)| area > best_area) {
            best = Some((i, area));
        }
    }
    best.map(|(i, _)| i)
}

/// Enumerate pairwise unions, largest first, and pick the first one whose
/// area ratio still fits under `max_area`. When no pair fits, rank the
/// candidates by corner distance instead and keep the closest `keep_boxes`.
pub fn containment_search(
    candidates: &[TextDetection],
    total_area: u64,
    max_area: f64,
    keep_boxes: usize,
    max_combinations: usize,
) -> Containment {
    let limit = capped_len(candidates.len(), max_combinations);
    if limit < candidates.len() {
        warn!(
            "containment search capped to the first {limit} of {} candidates ({max_combinations} pair limit)",
            candidates.len()
        );
    }

    // (union area, first index, second index, union rect); the sort is
    // stable, so equal areas keep enumeration order.
    let mut pairs = Vec::with_capacity(pair_count(limit));
    for i in 0..limit {
        for j in (i + 1)..limit {
            let union = candidates[i].rect.union(&candidates[j].rect);
            pairs.push((union.area(), i, j, union));
        }
    }
    pairs.sort_by(|a, b| b.0.cmp(&a.0));

    for (_, i, j, union) in pairs {
        let pct = union.area_ratio(total_area);
        if pct <= max_area {
            debug!("union of candidates {i} and {j} covers {pct:.3}% of the frame");
            return Containment::Union { rect: union, pct };
        }
    }

    // Fallback ranks every candidate, including any past the pair cap.
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by_key(|&i| candidates[i].rect.corner_distance_sq());
    let keep: Vec<usize> = order.iter().copied().take(keep_boxes).collect();
    let erase: Vec<usize> = order.iter().copied().skip(keep_boxes).collect();
    Containment::Fallback { keep, erase }
}

/// Largest candidate-list prefix whose pair count stays within the cap.
fn capped_len(n: usize, max_combinations: usize) -> usize {
    let mut len = n;
    while len > 2 && pair_count(len) > max_combinations {
        len -= 1;
    }
    len
}

fn pair_count(n: usize) -> usize {
    n * (n.saturating_sub(1)) / 2
}
