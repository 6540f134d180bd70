//! Association of per-frame detections to existing tracks.
//!
//! Cost is the Euclidean distance between a track's last known centroid and
//! a candidate detection's centroid; there is no motion model beyond
//! last-position. Assignment is greedy nearest-neighbor in ascending
//! distance order, restricted to pairs within the gating distance. A global
//! optimum is not required at parking-lot frame-to-frame displacements, and
//! greedy is deterministic: ties break toward the lower track id, then the
//! lower detection index.

use ndarray::Array2;

/// Result of matching detections against the active track set.
#[derive(Debug, Clone)]
pub struct AssignmentResult {
    /// Pairs of (track index, detection index)
    pub matches: Vec<(usize, usize)>,
    /// Track indices with no detection this frame (miss candidates)
    pub unmatched_tracks: Vec<usize>,
    /// Detection indices with no track (spawn candidates)
    pub unmatched_detections: Vec<usize>,
}

/// Compute the centroid distance matrix between tracks and detections.
///
/// Returns a matrix of shape (M, N) where M is the number of tracks and N
/// the number of detections.
pub fn centroid_distance(tracks: &[(f32, f32)], detections: &[(f32, f32)]) -> Array2<f32> {
    let mut dists = Array2::zeros((tracks.len(), detections.len()));
    for (i, t) in tracks.iter().enumerate() {
        for (j, d) in detections.iter().enumerate() {
            dists[[i, j]] = ((t.0 - d.0).powi(2) + (t.1 - d.1).powi(2)).sqrt();
        }
    }
    dists
}

/// Greedy one-to-one assignment over a cost matrix.
///
/// Pairs with cost above `gate` are never considered. `track_ids` carries
/// the stable id for each row so equal-cost candidates resolve
/// deterministically.
pub fn greedy_assignment(
    cost_matrix: &Array2<f32>,
    gate: f32,
    track_ids: &[u64],
) -> AssignmentResult {
    let (num_tracks, num_dets) = cost_matrix.dim();

    if num_tracks == 0 || num_dets == 0 {
        return AssignmentResult {
            matches: vec![],
            unmatched_tracks: (0..num_tracks).collect(),
            unmatched_detections: (0..num_dets).collect(),
        };
    }

    let mut candidates: Vec<(usize, usize, f32)> = Vec::new();
    for i in 0..num_tracks {
        for j in 0..num_dets {
            let d = cost_matrix[[i, j]];
            if d <= gate {
                candidates.push((i, j, d));
            }
        }
    }

    candidates.sort_by(|a, b| {
        a.2.total_cmp(&b.2)
            .then_with(|| track_ids[a.0].cmp(&track_ids[b.0]))
            .then_with(|| a.1.cmp(&b.1))
    });

    let mut track_used = vec![false; num_tracks];
    let mut det_used = vec![false; num_dets];
    let mut matches = Vec::new();

    for (i, j, _) in candidates {
        if track_used[i] || det_used[j] {
            continue;
        }
        track_used[i] = true;
        det_used[j] = true;
        matches.push((i, j));
    }

    let unmatched_tracks = track_used
        .iter()
        .enumerate()
        .filter_map(|(i, &used)| (!used).then_some(i))
        .collect();
    let unmatched_detections = det_used
        .iter()
        .enumerate()
        .filter_map(|(j, &used)| (!used).then_some(j))
        .collect();

    AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_wins() {
        let tracks = vec![(0.0, 0.0), (100.0, 0.0)];
        let dets = vec![(98.0, 0.0), (5.0, 0.0)];
        let cost = centroid_distance(&tracks, &dets);
        let result = greedy_assignment(&cost, 50.0, &[1, 2]);

        assert_eq!(result.matches, vec![(1, 0), (0, 1)]);
        assert!(result.unmatched_tracks.is_empty());
        assert!(result.unmatched_detections.is_empty());
    }

    #[test]
    fn test_gating_excludes_distant_pairs() {
        let tracks = vec![(0.0, 0.0)];
        let dets = vec![(200.0, 0.0)];
        let cost = centroid_distance(&tracks, &dets);
        let result = greedy_assignment(&cost, 50.0, &[1]);

        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_tracks, vec![0]);
        assert_eq!(result.unmatched_detections, vec![0]);
    }

    #[test]
    fn test_tie_breaks_to_lower_track_id() {
        // Two tracks equidistant from a single detection; the row with the
        // lower id wins regardless of row order.
        let tracks = vec![(10.0, 0.0), (-10.0, 0.0)];
        let dets = vec![(0.0, 0.0)];
        let cost = centroid_distance(&tracks, &dets);

        let result = greedy_assignment(&cost, 50.0, &[7, 3]);
        assert_eq!(result.matches, vec![(1, 0)]);

        let result = greedy_assignment(&cost, 50.0, &[3, 7]);
        assert_eq!(result.matches, vec![(0, 0)]);
    }

    #[test]
    fn test_one_to_one() {
        // One track, two detections in range: only one may match.
        let tracks = vec![(0.0, 0.0)];
        let dets = vec![(3.0, 0.0), (4.0, 0.0)];
        let cost = centroid_distance(&tracks, &dets);
        let result = greedy_assignment(&cost, 50.0, &[1]);

        assert_eq!(result.matches, vec![(0, 0)]);
        assert_eq!(result.unmatched_detections, vec![1]);
    }

    #[test]
    fn test_empty_inputs() {
        let cost = centroid_distance(&[], &[(1.0, 1.0)]);
        let result = greedy_assignment(&cost, 50.0, &[]);
        assert_eq!(result.unmatched_detections, vec![0]);

        let cost = centroid_distance(&[(1.0, 1.0)], &[]);
        let result = greedy_assignment(&cost, 50.0, &[9]);
        assert_eq!(result.unmatched_tracks, vec![0]);
    }
}
