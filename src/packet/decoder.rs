//! Parse skeleton bundles back into frame numbers, IDs and coordinates.

use rosc::{OscMessage, OscPacket, OscTime, OscType, decoder};

use crate::error::{Error, Result};
use crate::packet::encoder::{FRAME_ADDRESS, SKELETON_ADDRESS};
use crate::tracker::TrackId;

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSkeleton {
    pub id: TrackId,
    /// Keypoints as sent, with the vertical axis already inverted.
    pub points: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPacket {
    pub time_tag: OscTime,
    pub frame: i32,
    pub skeletons: Vec<DecodedSkeleton>,
}

fn malformed(msg: impl Into<String>) -> Error {
    Error::MalformedPacket(msg.into())
}

/// Decode one datagram produced by `SkeletonEncoder`.
pub fn decode_packet(bytes: &[u8]) -> Result<DecodedPacket> {
    let (rest, packet) =
        decoder::decode_udp(bytes).map_err(|err| malformed(format!("{err:?}")))?;
    if !rest.is_empty() {
        return Err(malformed(format!("{} trailing bytes after packet", rest.len())));
    }

    let bundle = match packet {
        OscPacket::Bundle(bundle) => bundle,
        OscPacket::Message(msg) => {
            return Err(malformed(format!("expected a bundle, got message {}", msg.addr)));
        }
    };

    let mut frame = None;
    let mut skeletons = Vec::new();

    for element in bundle.content {
        let OscPacket::Message(msg) = element else {
            return Err(malformed("nested bundle"));
        };
        match msg.addr.as_str() {
            FRAME_ADDRESS => {
                if frame.is_some() {
                    return Err(malformed("duplicate /frame message"));
                }
                frame = Some(decode_frame(&msg)?);
            }
            SKELETON_ADDRESS => skeletons.push(decode_skeleton(&msg)?),
            other => return Err(malformed(format!("unexpected address {other}"))),
        }
    }

    let frame = frame.ok_or_else(|| malformed("missing /frame message"))?;
    Ok(DecodedPacket {
        time_tag: bundle.timetag,
        frame,
        skeletons,
    })
}

fn decode_frame(msg: &OscMessage) -> Result<i32> {
    match msg.args.as_slice() {
        [OscType::Int(frame)] => Ok(*frame),
        _ => Err(malformed("/frame takes a single int")),
    }
}

fn decode_skeleton(msg: &OscMessage) -> Result<DecodedSkeleton> {
    let Some((OscType::Int(id), coords)) = msg.args.split_first() else {
        return Err(malformed("/skeleton must start with an int track ID"));
    };
    if coords.len() % 2 != 0 {
        return Err(malformed("/skeleton has an odd number of coordinates"));
    }

    let points = coords
        .chunks_exact(2)
        .map(|pair| match pair {
            [OscType::Float(x), OscType::Float(y)] => Ok((*x, *y)),
            _ => Err(malformed("/skeleton coordinates must be floats")),
        })
        .collect::<Result<Vec<_>>>()?;

    let id = TrackId::try_from(*id).map_err(|_| malformed(format!("negative track ID {id}")))?;
    Ok(DecodedSkeleton { id, points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosc::{OscBundle, encoder};

    fn bundle(content: Vec<OscPacket>) -> Vec<u8> {
        encoder::encode(&OscPacket::Bundle(OscBundle {
            timetag: OscTime::from((0, 1)),
            content,
        }))
        .unwrap()
    }

    fn message(addr: &str, args: Vec<OscType>) -> OscPacket {
        OscPacket::Message(OscMessage {
            addr: addr.to_string(),
            args,
        })
    }

    #[test]
    fn test_decode_frame_and_skeleton() {
        let bytes = bundle(vec![
            message("/frame", vec![OscType::Int(12)]),
            message(
                "/skeleton",
                vec![OscType::Int(3), OscType::Float(0.5), OscType::Float(0.25)],
            ),
        ]);
        let packet = decode_packet(&bytes).unwrap();
        assert_eq!(packet.frame, 12);
        assert_eq!(packet.time_tag, OscTime::from((0, 1)));
        assert_eq!(
            packet.skeletons,
            vec![DecodedSkeleton {
                id: 3,
                points: vec![(0.5, 0.25)]
            }]
        );
    }

    #[test]
    fn test_missing_frame() {
        let bytes = bundle(vec![message("/skeleton", vec![OscType::Int(1)])]);
        assert!(matches!(decode_packet(&bytes), Err(Error::MalformedPacket(_))));
    }

    #[test]
    fn test_bare_message_rejected() {
        let bytes = encoder::encode(&message("/frame", vec![OscType::Int(1)])).unwrap();
        assert!(matches!(decode_packet(&bytes), Err(Error::MalformedPacket(_))));
    }

    #[test]
    fn test_odd_coordinates_rejected() {
        let bytes = bundle(vec![
            message("/frame", vec![OscType::Int(1)]),
            message("/skeleton", vec![OscType::Int(1), OscType::Float(0.5)]),
        ]);
        assert!(matches!(decode_packet(&bytes), Err(Error::MalformedPacket(_))));
    }

    #[test]
    fn test_negative_id_rejected() {
        let bytes = bundle(vec![
            message("/frame", vec![OscType::Int(1)]),
            message(
                "/skeleton",
                vec![OscType::Int(-3), OscType::Float(0.5), OscType::Float(0.5)],
            ),
        ]);
        assert!(matches!(decode_packet(&bytes), Err(Error::MalformedPacket(_))));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = encoder::encode(&message("/frame", vec![OscType::Int(1)])).unwrap();
        bytes.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        assert!(matches!(decode_packet(&bytes), Err(Error::MalformedPacket(_))));

        let mut bytes = bundle(vec![message("/frame", vec![OscType::Int(1)])]);
        bytes.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        assert!(matches!(decode_packet(&bytes), Err(Error::MalformedPacket(_))));
    }

    #[test]
    fn test_truncated_bytes_rejected() {
        let bytes = bundle(vec![message("/frame", vec![OscType::Int(1)])]);
        assert!(decode_packet(&bytes[..bytes.len() - 2]).is_err());
    }
}
