//! Multi-target tracking and OSC streaming for skeletons produced by a pose
//! estimator.
//!
//! [`CentroidTracker`] gives every detected person a track ID that stays
//! stable across frames, [`SkeletonEncoder`] packs the tracked keypoints into
//! one size-bounded OSC bundle per frame, and [`SkeletonPipeline`] chains both
//! in front of a [`Transport`].

pub mod config;
pub mod error;
pub mod integration;
pub mod packet;
pub mod tracker;

pub use config::Config;
pub use error::{Error, Result};
pub use integration::{FrameReport, SkeletonPipeline, Transport, UdpTransport};
pub use packet::{DecodedPacket, DecodedSkeleton, EncodedFrame, SkeletonEncoder, decode_packet};
pub use tracker::{CentroidTracker, MatchStrategy, Rect, TrackId, TrackerConfig};
