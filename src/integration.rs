//! Integration module for driving the tracker and encoder from a frame source.
//!
//! This module provides the `Transport` trait for packet delivery, a UDP
//! implementation, and a pipeline that runs one frame at a time.

mod pipeline;
mod transport;

pub use pipeline::{FrameReport, SkeletonPipeline};
pub use transport::{Transport, UdpTransport};
