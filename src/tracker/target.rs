//! A single tracked target.

use crate::tracker::rect::Rect;
use crate::tracker::track_state::TrackState;

/// Identity assigned to a target, unique for the lifetime of a tracker.
pub type TrackId = u32;

/// Persistent entity followed across frames.
#[derive(Debug, Clone)]
pub struct Target {
    /// Unique track identifier
    pub track_id: TrackId,
    /// Current track state
    pub state: TrackState,
    /// Last matched bounding box
    pub rect: Rect,
    /// Consecutive frames without a match
    pub last_seen: u32,
    /// Frames since creation
    pub age: u32,
    /// Frame index when the target was created
    pub start_frame: u64,
}

impl Target {
    pub fn new(track_id: TrackId, rect: Rect, frame_id: u64) -> Self {
        Self {
            track_id,
            state: TrackState::New,
            rect,
            last_seen: 0,
            age: 0,
            start_frame: frame_id,
        }
    }

    /// Take over the matched box and reset the miss counter.
    pub fn update(&mut self, rect: Rect) {
        self.rect = rect;
        self.last_seen = 0;
        self.age += 1;
        self.state = TrackState::Tracked;
    }

    /// Record a frame without a match.
    pub fn mark_lost(&mut self) {
        self.last_seen += 1;
        self.age += 1;
        self.state = TrackState::Lost;
    }

    /// Whether the target has gone unmatched for longer than `persistence` frames.
    pub fn is_expired(&self, persistence: u32) -> bool {
        self.last_seen > persistence
    }
}
