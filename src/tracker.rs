mod centroid_tracker;
mod matching;
mod rect;
mod target;
mod track_state;

pub use centroid_tracker::{CentroidTracker, TrackerConfig};
pub use matching::{AssignmentResult, MatchStrategy, greedy_assignment, linear_assignment};
pub use rect::{Rect, bounding_rects};
pub use target::{Target, TrackId};
pub use track_state::TrackState;
