//! Matching utilities for multi-target tracking.

use crate::tracker::rect::Rect;
use log::{trace, warn};
use ndarray::Array2;
use serde::Deserialize;

/// Cost assigned to pairs that may never be matched when solving optimally.
const INVALID_MATCH: f64 = 1e6;

/// How targets are paired with the boxes of a new frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Smallest remaining distance first until the threshold is exceeded.
    #[default]
    Greedy,
    /// Minimum total cost assignment (Jonker-Volgenant).
    Optimal,
}

/// Compute the tracking distance matrix between targets and boxes.
pub fn tracking_distance(target_boxes: &[Rect], det_boxes: &[Rect]) -> Array2<f32> {
    let mut dists = Array2::zeros((target_boxes.len(), det_boxes.len()));
    for (i, t) in target_boxes.iter().enumerate() {
        for (j, d) in det_boxes.iter().enumerate() {
            dists[[i, j]] = t.tracking_distance(d);
        }
    }
    dists
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

impl AssignmentResult {
    fn from_matches(matches: Vec<(usize, usize)>, num_rows: usize, num_cols: usize) -> Self {
        let mut row_free = vec![true; num_rows];
        let mut col_free = vec![true; num_cols];
        for &(i, j) in &matches {
            row_free[i] = false;
            col_free[j] = false;
        }

        Self {
            matches,
            unmatched_tracks: (0..num_rows).filter(|&i| row_free[i]).collect(),
            unmatched_detections: (0..num_cols).filter(|&j| col_free[j]).collect(),
        }
    }
}

pub fn assign(cost_matrix: &Array2<f32>, thresh: f32, strategy: MatchStrategy) -> AssignmentResult {
    match strategy {
        MatchStrategy::Greedy => greedy_assignment(cost_matrix, thresh),
        MatchStrategy::Optimal => linear_assignment(cost_matrix, thresh),
    }
}

/// Pair rows and columns smallest cost first.
///
/// Equal costs resolve by row, then column. Stops at the first pair whose
/// cost exceeds `thresh`; NaN costs never match.
pub fn greedy_assignment(cost_matrix: &Array2<f32>, thresh: f32) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    let mut pairs: Vec<(usize, usize, f32)> = cost_matrix
        .indexed_iter()
        .filter(|(_, cost)| !cost.is_nan())
        .map(|((i, j), &cost)| (i, j, cost))
        .collect();
    pairs.sort_by(|a, b| a.2.total_cmp(&b.2));

    let mut row_taken = vec![false; num_rows];
    let mut col_taken = vec![false; num_cols];
    let mut matches = vec![];

    for (i, j, cost) in pairs {
        if cost > thresh {
            break;
        }
        if row_taken[i] || col_taken[j] {
            continue;
        }
        trace!("greedy match: target {i} box {j} cost {cost}");
        row_taken[i] = true;
        col_taken[j] = true;
        matches.push((i, j));
    }

    AssignmentResult::from_matches(matches, num_rows, num_cols)
}

pub fn linear_assignment(cost_matrix: &Array2<f32>, thresh: f32) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    if num_rows == 0 || num_cols == 0 {
        return AssignmentResult::from_matches(vec![], num_rows, num_cols);
    }

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), INVALID_MATCH);

    for ((i, j), &cost) in cost_matrix.indexed_iter() {
        if cost <= thresh {
            padded[[i, j]] = cost as f64;
        }
    }

    let mut matches = vec![];
    match lapjv::lapjv(&padded) {
        Ok((row_to_col, _)) => {
            for (row_idx, &col_idx) in row_to_col.iter().enumerate().take(num_rows) {
                if col_idx < num_cols && cost_matrix[[row_idx, col_idx]] <= thresh {
                    trace!(
                        "optimal match: target {row_idx} box {col_idx} cost {}",
                        cost_matrix[[row_idx, col_idx]]
                    );
                    matches.push((row_idx, col_idx));
                }
            }
        }
        Err(_) => {
            warn!("assignment solver failed, leaving all targets unmatched");
        }
    }

    AssignmentResult::from_matches(matches, num_rows, num_cols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_greedy_takes_smallest_first() {
        // Greedy commits (0, 0) at 1.0 and leaves target 1 without a box,
        // although (0, 1) + (1, 0) would cost less in total.
        let costs = array![[1.0, 2.0], [1.5, 10.0]];
        let result = greedy_assignment(&costs, 5.0);
        assert_eq!(result.matches, vec![(0, 0)]);
        assert_eq!(result.unmatched_tracks, vec![1]);
        assert_eq!(result.unmatched_detections, vec![1]);
    }

    #[test]
    fn test_optimal_minimizes_total_cost() {
        let costs = array![[1.0, 2.0], [1.5, 10.0]];
        let mut result = linear_assignment(&costs, 5.0);
        result.matches.sort();
        assert_eq!(result.matches, vec![(0, 1), (1, 0)]);
        assert!(result.unmatched_tracks.is_empty());
        assert!(result.unmatched_detections.is_empty());
    }

    #[test]
    fn test_threshold_rejects_pairs() {
        let costs = array![[6.0, 7.0]];
        for strategy in [MatchStrategy::Greedy, MatchStrategy::Optimal] {
            let result = assign(&costs, 5.0, strategy);
            assert!(result.matches.is_empty());
            assert_eq!(result.unmatched_tracks, vec![0]);
            assert_eq!(result.unmatched_detections, vec![0, 1]);
        }
    }

    #[test]
    fn test_greedy_tie_breaks_by_row_then_column() {
        let costs = array![[1.0, 1.0], [1.0, 1.0]];
        let result = greedy_assignment(&costs, 5.0);
        assert_eq!(result.matches, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_greedy_ignores_nan() {
        let costs = array![[f32::NAN, 0.5]];
        let result = greedy_assignment(&costs, 1.0);
        assert_eq!(result.matches, vec![(0, 1)]);
        assert_eq!(result.unmatched_detections, vec![0]);
    }

    #[test]
    fn test_empty_inputs() {
        let no_targets = Array2::<f32>::zeros((0, 3));
        let result = greedy_assignment(&no_targets, 1.0);
        assert_eq!(result.unmatched_detections, vec![0, 1, 2]);

        let no_boxes = Array2::<f32>::zeros((2, 0));
        let result = linear_assignment(&no_boxes, 1.0);
        assert_eq!(result.unmatched_tracks, vec![0, 1]);
        assert!(result.unmatched_detections.is_empty());
    }

    #[test]
    fn test_tracking_distance_matrix() {
        let targets = [Rect::from_center(0.0, 0.0, 1.0, 1.0)];
        let boxes = [
            Rect::from_center(3.0, 4.0, 1.0, 1.0),
            Rect::from_center(0.0, 0.0, 1.0, 1.0),
        ];
        let dists = tracking_distance(&targets, &boxes);
        assert_eq!(dists.dim(), (1, 2));
        assert!((dists[[0, 0]] - 5.0).abs() < 1e-6);
        assert_eq!(dists[[0, 1]], 0.0);
    }
}
