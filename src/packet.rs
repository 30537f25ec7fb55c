//! OSC bundle codec for tracked skeletons.
//!
//! Each frame becomes one bundle holding a `/frame` message with the frame
//! number and one `/skeleton` message per tracked person: the track ID
//! followed by `x, 1 - y` for every keypoint.

mod decoder;
mod encoder;

pub use decoder::{DecodedPacket, DecodedSkeleton, decode_packet};
pub use encoder::{
    BODY_25_PARTS, BUNDLE_HEADER_LEN, DEFAULT_MAX_DATAGRAM, EncodedFrame, FRAME_ADDRESS,
    MIN_CAPACITY, SKELETON_ADDRESS, SkeletonEncoder, TIME_TAG, capacity_for_datagram, encode,
    frame_message_len, skeleton_message_len,
};
