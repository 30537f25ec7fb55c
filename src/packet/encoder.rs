//! Streaming encoder producing one size-bounded OSC bundle per frame.

use log::{debug, warn};
use ndarray::ArrayView3;
use rosc::{OscBundle, OscMessage, OscPacket, OscTime, OscType, encoder};

use crate::error::{Error, Result};
use crate::tracker::TrackId;

pub const FRAME_ADDRESS: &str = "/frame";
pub const SKELETON_ADDRESS: &str = "/skeleton";

/// Placeholder bundle time-tag; receivers do not synchronize on it.
pub const TIME_TAG: OscTime = OscTime {
    seconds: 0,
    fractional: 1234,
};

/// `#bundle\0` followed by the 8-byte time-tag.
pub const BUNDLE_HEADER_LEN: usize = 16;

/// Largest datagram the default UDP transport sends.
pub const DEFAULT_MAX_DATAGRAM: usize = 8192;

/// Keypoints per person in the BODY_25 model.
pub const BODY_25_PARTS: usize = 25;

/// Smallest capacity that still holds the bundle header and `/frame`.
pub const MIN_CAPACITY: usize = BUNDLE_HEADER_LEN + frame_message_len();

/// Length of an OSC string including its terminator and padding.
const fn osc_string_len(len: usize) -> usize {
    (len + 4) & !3
}

/// Size of the `/frame` bundle element, including its size prefix.
pub const fn frame_message_len() -> usize {
    4 + osc_string_len(FRAME_ADDRESS.len()) + osc_string_len(2) + 4
}

/// Size of one `/skeleton` bundle element with `parts` keypoints,
/// including its size prefix.
pub const fn skeleton_message_len(parts: usize) -> usize {
    4 + osc_string_len(SKELETON_ADDRESS.len()) + osc_string_len(2 + 2 * parts) + 4 + 8 * parts
}

/// Byte budget for a transport limited to `max_datagram` bytes, keeping one
/// worst-case skeleton message of headroom.
pub const fn capacity_for_datagram(max_datagram: usize, parts: usize) -> usize {
    max_datagram.saturating_sub(skeleton_message_len(parts))
}

/// Result of encoding one frame. Borrows the encoder's buffer.
#[derive(Debug, Clone, Copy)]
pub struct EncodedFrame<'a> {
    bytes: &'a [u8],
    skeletons: usize,
    omitted: usize,
}

impl<'a> EncodedFrame<'a> {
    /// The finished bundle, ready to be sent as one datagram.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of `/skeleton` messages in the bundle.
    pub fn skeletons(&self) -> usize {
        self.skeletons
    }

    /// Number of persons left out of the bundle.
    pub fn omitted(&self) -> usize {
        self.omitted
    }
}

/// Encodes `/frame` and `/skeleton` messages into a buffer that is allocated
/// once and reused for every frame.
#[derive(Debug)]
pub struct SkeletonEncoder {
    capacity: usize,
    buffer: Vec<u8>,
    frame: OscPacket,
    skeleton: OscPacket,
}

impl SkeletonEncoder {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity < MIN_CAPACITY {
            return Err(Error::CapacityTooSmall {
                capacity,
                minimum: MIN_CAPACITY,
            });
        }

        Ok(Self {
            capacity,
            buffer: Vec::with_capacity(capacity + skeleton_message_len(BODY_25_PARTS)),
            frame: OscPacket::Message(OscMessage {
                addr: FRAME_ADDRESS.to_string(),
                args: Vec::with_capacity(1),
            }),
            skeleton: OscPacket::Message(OscMessage {
                addr: SKELETON_ADDRESS.to_string(),
                args: Vec::with_capacity(1 + 2 * BODY_25_PARTS),
            }),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Encode one frame.
    ///
    /// `keypoints` is shaped `(persons, parts, dims)` with `(x, y, score)` on
    /// the last axis; `ids[i]` is the track ID of person `i`. Persons are
    /// written in order until the next message would exceed the capacity.
    /// Unless every keypoint carries exactly two coordinates, only `/frame`
    /// is written.
    pub fn encode(
        &mut self,
        frame_number: i32,
        keypoints: ArrayView3<'_, f32>,
        ids: &[TrackId],
    ) -> Result<EncodedFrame<'_>> {
        let (persons, _, dims) = keypoints.dim();
        if ids.len() != persons {
            return Err(Error::IdCountMismatch {
                persons,
                ids: ids.len(),
            });
        }

        self.buffer.clear();
        write_packet(
            &mut self.buffer,
            &OscPacket::Bundle(OscBundle {
                timetag: TIME_TAG,
                content: Vec::new(),
            }),
        );

        if let OscPacket::Message(frame) = &mut self.frame {
            frame.args.clear();
            frame.args.push(OscType::Int(frame_number));
        }
        write_element(&mut self.buffer, &self.frame);

        let has_coordinates = dims.saturating_sub(1) == 2;
        let mut skeletons = 0;
        if !has_coordinates {
            warn!("frame {frame_number}: keypoints have {dims} values per part, skipping skeletons");
        } else {
            for (person, &id) in keypoints.outer_iter().zip(ids) {
                if self.buffer.len() >= self.capacity {
                    break;
                }

                if let OscPacket::Message(skeleton) = &mut self.skeleton {
                    let args = &mut skeleton.args;
                    args.clear();
                    args.push(OscType::Int(id as i32));
                    for part in person.rows() {
                        args.push(OscType::Float(part[0]));
                        args.push(OscType::Float(1.0 - part[1]));
                    }
                }

                let start = self.buffer.len();
                write_element(&mut self.buffer, &self.skeleton);
                if self.buffer.len() > self.capacity {
                    self.buffer.truncate(start);
                    break;
                }
                skeletons += 1;
            }
        }

        let omitted = persons - skeletons;
        if omitted > 0 && has_coordinates {
            debug!(
                "frame {frame_number}: capacity {} reached, {omitted} of {persons} skeletons dropped",
                self.capacity
            );
        }

        Ok(EncodedFrame {
            bytes: &self.buffer,
            skeletons,
            omitted,
        })
    }
}

/// Encode `keypoints` into a freshly allocated bundle of at most `capacity` bytes.
pub fn encode(
    frame_number: i32,
    keypoints: ArrayView3<'_, f32>,
    ids: &[TrackId],
    capacity: usize,
) -> Result<Vec<u8>> {
    let mut encoder = SkeletonEncoder::new(capacity)?;
    let frame = encoder.encode(frame_number, keypoints, ids)?;
    Ok(frame.bytes().to_vec())
}

/// Append `packet` to `buf`, returning the number of bytes written.
fn write_packet(buf: &mut Vec<u8>, packet: &OscPacket) -> usize {
    let Ok(len) = encoder::encode_into(packet, buf);
    len
}

/// Append `packet` as a bundle element: big-endian size, then the packet.
fn write_element(buf: &mut Vec<u8>, packet: &OscPacket) {
    let start = buf.len();
    buf.extend_from_slice(&[0; 4]);
    let len = write_packet(buf, packet) as i32;
    buf[start..start + 4].copy_from_slice(&len.to_be_bytes());
}
