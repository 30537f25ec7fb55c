//! SkeletonPipeline for combining tracking, encoding and delivery.

use log::{trace, warn};
use ndarray::{ArrayView3, s};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::packet::SkeletonEncoder;
use crate::tracker::{CentroidTracker, TrackId, TrackerConfig, bounding_rects};

use super::{Transport, UdpTransport};

/// Outcome of one processed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_number: i32,
    /// Track ID per input person, empty when tracking was skipped.
    pub ids: Vec<TrackId>,
    pub bytes_sent: usize,
    pub skeletons: usize,
    pub omitted: usize,
}

/// Runs keypoints → boxes → tracker → encoder → transport once per frame.
///
/// Frames must be fed in order from a single thread; the tracker state
/// carries over between calls.
pub struct SkeletonPipeline<T: Transport> {
    tracker: CentroidTracker,
    encoder: SkeletonEncoder,
    transport: T,
    frame_number: i32,
}

impl SkeletonPipeline<UdpTransport> {
    /// Build a pipeline sending to the configured OSC destination.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = UdpTransport::connect(&config.osc.address, config.osc.port)?;
        Self::new(config.tracker.clone(), config.packet.capacity, transport)
    }
}

impl<T: Transport> SkeletonPipeline<T>
where
    T::Error: Into<Error>,
{
    pub fn new(tracker_config: TrackerConfig, capacity: usize, transport: T) -> Result<Self> {
        tracker_config.validate()?;
        Ok(Self {
            tracker: CentroidTracker::new(tracker_config),
            encoder: SkeletonEncoder::new(capacity)?,
            transport,
            frame_number: 0,
        })
    }

    /// Track and send one frame of `(persons, parts, dims)` keypoints.
    ///
    /// When the keypoints carry no `(x, y)` pair, tracking is skipped and
    /// only the `/frame` message is sent.
    pub fn process_frame(&mut self, keypoints: ArrayView3<'_, f32>) -> Result<FrameReport> {
        self.frame_number = self.frame_number.wrapping_add(1);
        let frame_number = self.frame_number;

        let (persons, _, dims) = keypoints.dim();
        let (keypoints, ids) = if dims < 3 {
            warn!("frame {frame_number}: {dims} values per keypoint, tracking skipped");
            (keypoints.slice_move(s![..0, .., ..]), Vec::new())
        } else {
            let boxes = bounding_rects(keypoints);
            (keypoints, self.tracker.track(&boxes))
        };

        let encoded = self.encoder.encode(frame_number, keypoints, &ids)?;
        self.transport.send(encoded.bytes()).map_err(Into::into)?;
        trace!(
            "frame {frame_number}: {persons} persons, {} bytes sent",
            encoded.len()
        );

        Ok(FrameReport {
            frame_number,
            bytes_sent: encoded.len(),
            skeletons: encoded.skeletons(),
            omitted: persons - encoded.skeletons(),
            ids,
        })
    }

    /// Number of the most recently processed frame.
    pub fn frame_number(&self) -> i32 {
        self.frame_number
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &CentroidTracker {
        &self.tracker
    }

    /// Get a reference to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
