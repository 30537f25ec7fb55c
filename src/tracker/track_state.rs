/// Where a live target stands after the most recent `track` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Spawned from an unmatched box this frame
    #[default]
    New,
    /// Matched to a box this frame
    Tracked,
    /// Missed this frame, still within persistence
    Lost,
}
