//! Bounding-box tracker assigning stable labels across frames.

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::tracker::matching::{self, AssignmentResult, MatchStrategy};
use crate::tracker::rect::Rect;
use crate::tracker::target::{Target, TrackId};

/// Configuration for the CentroidTracker.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Frames a target may go unmatched before it is evicted.
    pub persistence: u32,
    /// Largest tracking distance still accepted as a match.
    pub max_distance: f32,
    pub strategy: MatchStrategy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            persistence: 10,
            max_distance: 0.5,
            strategy: MatchStrategy::Greedy,
        }
    }
}

impl TrackerConfig {
    /// Reject a `max_distance` that is negative or NaN.
    pub fn validate(&self) -> Result<()> {
        if self.max_distance.is_nan() || self.max_distance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max_distance must be a non-negative number, got {}",
                self.max_distance
            )));
        }
        Ok(())
    }
}

pub struct CentroidTracker {
    targets: Vec<Target>,
    labels: Vec<TrackId>,
    new_labels: Vec<TrackId>,
    dead_labels: Vec<TrackId>,
    next_id: TrackId,
    frame_id: u64,
    config: TrackerConfig,
}

impl CentroidTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            targets: Vec::new(),
            labels: Vec::new(),
            new_labels: Vec::new(),
            dead_labels: Vec::new(),
            next_id: 0,
            frame_id: 0,
            config,
        }
    }

    /// Assign a label to every box of the current frame.
    ///
    /// Returns one label per box, in input order. Must be called once per
    /// frame with the frame's complete set of boxes; an empty slice ages
    /// every live target.
    pub fn track(&mut self, boxes: &[Rect]) -> Vec<TrackId> {
        self.frame_id += 1;
        self.new_labels.clear();
        self.dead_labels.clear();

        let target_rects: Vec<Rect> = self.targets.iter().map(|t| t.rect).collect();
        let dists = matching::tracking_distance(&target_rects, boxes);

        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = matching::assign(&dists, self.config.max_distance, self.config.strategy);

        let mut labels = vec![0; boxes.len()];

        for (itarget, ibox) in matches {
            let target = &mut self.targets[itarget];
            target.update(boxes[ibox]);
            labels[ibox] = target.track_id;
        }

        for itarget in unmatched_tracks {
            self.targets[itarget].mark_lost();
        }

        let persistence = self.config.persistence;
        let dead_labels = &mut self.dead_labels;
        self.targets.retain(|t| {
            if t.is_expired(persistence) {
                debug!("target {} evicted after {} missed frames", t.track_id, t.last_seen);
                dead_labels.push(t.track_id);
                false
            } else {
                true
            }
        });

        for ibox in unmatched_detections {
            let track_id = self.next_track_id();
            debug!("target {track_id} created at frame {}", self.frame_id);
            self.targets.push(Target::new(track_id, boxes[ibox], self.frame_id));
            self.new_labels.push(track_id);
            labels[ibox] = track_id;
        }

        self.labels.clone_from(&labels);
        labels
    }

    fn next_track_id(&mut self) -> TrackId {
        self.next_id += 1;
        self.next_id
    }

    /// Label given to box `index` by the most recent `track` call.
    pub fn label_from_index(&self, index: usize) -> Option<TrackId> {
        self.labels.get(index).copied()
    }

    /// Index of the box labelled `label` by the most recent `track` call.
    pub fn index_from_label(&self, label: TrackId) -> Option<usize> {
        self.labels.iter().position(|&l| l == label)
    }

    /// Labels of every live target, including those currently unmatched.
    pub fn current_labels(&self) -> Vec<TrackId> {
        self.targets.iter().map(|t| t.track_id).collect()
    }

    /// Labels created by the most recent `track` call.
    pub fn new_labels(&self) -> &[TrackId] {
        &self.new_labels
    }

    /// Labels evicted by the most recent `track` call.
    pub fn dead_labels(&self) -> &[TrackId] {
        &self.dead_labels
    }

    pub fn target(&self, label: TrackId) -> Option<&Target> {
        self.targets.iter().find(|t| t.track_id == label)
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Number of `track` calls so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_id
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::TrackState;

    fn tracker(persistence: u32, max_distance: f32) -> CentroidTracker {
        CentroidTracker::new(TrackerConfig {
            persistence,
            max_distance,
            ..Default::default()
        })
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let mut tracker = tracker(2, 1.0);
        let labels = tracker.track(&[
            Rect::from_center(0.0, 0.0, 1.0, 1.0),
            Rect::from_center(50.0, 0.0, 1.0, 1.0),
        ]);
        assert_eq!(labels, vec![1, 2]);
        assert_eq!(tracker.new_labels(), &[1, 2]);
        assert_eq!(tracker.frame_count(), 1);
    }

    #[test]
    fn test_states_after_frame() {
        let mut tracker = tracker(2, 1.0);
        tracker.track(&[
            Rect::from_center(0.0, 0.0, 1.0, 1.0),
            Rect::from_center(50.0, 0.0, 1.0, 1.0),
        ]);
        tracker.track(&[Rect::from_center(0.1, 0.0, 1.0, 1.0)]);

        assert_eq!(tracker.target(1).map(|t| t.state), Some(TrackState::Tracked));
        assert_eq!(tracker.target(2).map(|t| t.state), Some(TrackState::Lost));
        assert_eq!(tracker.target(2).map(|t| t.last_seen), Some(1));
        assert!(tracker.new_labels().is_empty());
    }

    #[test]
    fn test_label_lookup() {
        let mut tracker = tracker(2, 1.0);
        tracker.track(&[
            Rect::from_center(0.0, 0.0, 1.0, 1.0),
            Rect::from_center(50.0, 0.0, 1.0, 1.0),
        ]);
        let labels = tracker.track(&[
            Rect::from_center(50.0, 0.0, 1.0, 1.0),
            Rect::from_center(0.0, 0.0, 1.0, 1.0),
        ]);
        assert_eq!(labels, vec![2, 1]);
        assert_eq!(tracker.label_from_index(0), Some(2));
        assert_eq!(tracker.index_from_label(1), Some(1));
        assert_eq!(tracker.label_from_index(5), None);
    }

    #[test]
    fn test_validate_max_distance() {
        assert!(TrackerConfig::default().validate().is_ok());

        for max_distance in [f32::NAN, -0.1] {
            let config = TrackerConfig {
                max_distance,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }

        let zero = TrackerConfig {
            max_distance: 0.0,
            ..Default::default()
        };
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn test_dead_labels_reported_once() {
        let mut tracker = tracker(0, 1.0);
        tracker.track(&[Rect::from_center(0.0, 0.0, 1.0, 1.0)]);
        tracker.track(&[]);
        assert_eq!(tracker.dead_labels(), &[1]);
        assert!(tracker.is_empty());

        tracker.track(&[]);
        assert!(tracker.dead_labels().is_empty());
    }
}
