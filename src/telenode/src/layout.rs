//! Wire layout of the frames.
//!
//! A bus cycle is made of [`BUS_FRAME_COUNT`] frames with consecutive identifiers starting at
//! the base identifier. Multi-byte values are little-endian `u16`s; temperatures are `i8`s in
//! degrees Celsius, −128 meaning a faulty sensor.
//!
//! | Frame      | Bytes 0-1       | Bytes 2-3 | Bytes 4-5 | Bytes 6-7 |
//! |------------|-----------------|-----------|-----------|-----------|
//! | `base`     | CPU °C, 0       | V0        | V1        | V2        |
//! | `base + 1` | V3              | V4        | V5        | V6        |
//! | `base + 2` | V7              | V8        | V9        | 0         |
//! | `base + 4` | P2              | P3        | 0         | 0         |
//!
//! Frame `base + 3` is unaligned: byte 0 to 2 are the three temperatures, bytes 3-4 hold P0,
//! bytes 5-6 hold P1, and byte 7 is 0.
//!
//! `Vn` is the filtered voltage of channel `n` in millivolts, `Pn` the `n`-th derived pressure
//! (see [`PRESSURE_SCALING`](telenode_convert::PRESSURE_SCALING)).

use telenode_hal::{frame::PAYLOAD_LEN, Frame, CHANNEL_COUNT};

use crate::config::{PRESSURE_CHANNEL_COUNT, TEMPERATURE_SLOT_COUNT};

/// Number of frames in a bus cycle.
pub const BUS_FRAME_COUNT: usize = 5;

/// Values sent in a bus cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Telemetry {
    /// CPU temperature, in degrees Celsius.
    pub cpu_celsius: i8,
    /// Filtered voltages, in millivolts.
    pub voltages: [u16; CHANNEL_COUNT],
    /// Thermistor temperatures, in degrees Celsius.
    pub temperatures: [i8; TEMPERATURE_SLOT_COUNT],
    /// Derived pressures, fixed-point.
    pub pressures: [u16; PRESSURE_CHANNEL_COUNT],
}

/// Converts a temperature to its wire representation, saturating to the `i8` range.
#[must_use]
pub fn temperature_byte(celsius: i16) -> i8 {
    i8::try_from(celsius).unwrap_or(if celsius < 0 { i8::MIN } else { i8::MAX })
}

/// Returns frame `index` of a bus cycle, or `None` if `index` is not below
/// [`BUS_FRAME_COUNT`] or if its identifier would not fit a `u32`.
#[must_use]
pub fn bus_frame(base_id: u32, index: usize, telemetry: &Telemetry) -> Option<Frame> {
    let mut payload = Payload::default();
    let Telemetry {
        cpu_celsius,
        voltages: v,
        temperatures: t,
        pressures: p,
    } = telemetry;

    match index {
        0 => {
            payload.put_i8(0, *cpu_celsius);
            payload.put_u16s(2, v.get(0..3)?);
        }
        1 => payload.put_u16s(0, v.get(3..7)?),
        2 => payload.put_u16s(0, v.get(7..10)?),
        3 => {
            for (offset, celsius) in t.iter().enumerate() {
                payload.put_i8(offset, *celsius);
            }
            payload.put_u16s(3, p.get(0..2)?);
        }
        4 => payload.put_u16s(0, p.get(2..4)?),
        _ => return None,
    }

    let offset = u32::try_from(index).ok()?;
    Some(Frame::new(base_id.checked_add(offset)?, payload.0))
}

/// Returns all frames of a bus cycle.
///
/// Frames whose identifier would not fit a `u32` are left as [`Frame::default()`].
#[must_use]
pub fn bus_frames(base_id: u32, telemetry: &Telemetry) -> [Frame; BUS_FRAME_COUNT] {
    let mut frames = [Frame::default(); BUS_FRAME_COUNT];
    for (index, frame) in frames.iter_mut().enumerate() {
        if let Some(built) = bus_frame(base_id, index, telemetry) {
            *frame = built;
        }
    }
    frames
}

/// Returns the wireless frame, carrying the voltage of channel 0.
#[must_use]
pub fn wireless_frame(frame_id: u32, v0_mv: u16) -> Frame {
    let mut payload = Payload::default();
    payload.put_u16s(0, &[v0_mv]);
    Frame::new(frame_id, payload.0)
}

/// Decodes the values of a bus cycle, as a receiver would.
///
/// Frames with unknown identifiers are ignored. Returns `None` unless all frames of the cycle
/// are present, which they cannot be when `base_id` leaves no room for their identifiers.
#[must_use]
pub fn decode_bus_frames(base_id: u32, frames: &[Frame]) -> Option<Telemetry> {
    let frame = |index: u32| {
        frames
            .iter()
            .rev()
            .find(|frame| Some(frame.identifier) == base_id.checked_add(index))
            .map(|frame| Payload(frame.payload))
    };
    let (f0, f1, f2, f3, f4) = (frame(0)?, frame(1)?, frame(2)?, frame(3)?, frame(4)?);

    Some(Telemetry {
        cpu_celsius: f0.i8(0),
        voltages: [
            f0.u16(2),
            f0.u16(4),
            f0.u16(6),
            f1.u16(0),
            f1.u16(2),
            f1.u16(4),
            f1.u16(6),
            f2.u16(0),
            f2.u16(2),
            f2.u16(4),
        ],
        temperatures: [f3.i8(0), f3.i8(1), f3.i8(2)],
        pressures: [f3.u16(3), f3.u16(5), f4.u16(0), f4.u16(2)],
    })
}

#[derive(Default)]
struct Payload([u8; PAYLOAD_LEN]);

impl Payload {
    fn put_i8(&mut self, offset: usize, value: i8) {
        if let Some(byte) = self.0.get_mut(offset) {
            *byte = value.to_le_bytes()[0];
        }
    }

    fn put_u16s(&mut self, offset: usize, values: &[u16]) {
        for (i, value) in values.iter().enumerate() {
            let start = offset + 2 * i;
            if let Some(bytes) = self.0.get_mut(start..start + 2) {
                bytes.copy_from_slice(&value.to_le_bytes());
            }
        }
    }

    fn i8(&self, offset: usize) -> i8 {
        self.0
            .get(offset)
            .map_or(0, |byte| i8::from_le_bytes([*byte]))
    }

    fn u16(&self, offset: usize) -> u16 {
        self.0
            .get(offset..offset + 2)
            .and_then(|bytes| bytes.try_into().ok())
            .map_or(0, u16::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: u32 = 0x76c;

    fn telemetry() -> Telemetry {
        Telemetry {
            cpu_celsius: -5,
            voltages: [
                0x0102, 0x0304, 0x0506, 0x0708, 0x090a, 0x0b0c, 0x0d0e, 0x0f10, 0x1112, 0x1314,
            ],
            temperatures: [21, -128, 0],
            pressures: [0x2122, 0x2324, 0x2526, 0x2728],
        }
    }

    #[test]
    fn test_bus_layout() {
        let frames = bus_frames(BASE, &telemetry());

        let identifiers = frames.map(|frame| frame.identifier);
        assert_eq!(identifiers, [0x76c, 0x76d, 0x76e, 0x76f, 0x770]);

        let payloads = frames.map(|frame| frame.payload);
        assert_eq!(
            payloads,
            [
                [0xfb, 0x00, 0x02, 0x01, 0x04, 0x03, 0x06, 0x05],
                [0x08, 0x07, 0x0a, 0x09, 0x0c, 0x0b, 0x0e, 0x0d],
                [0x10, 0x0f, 0x12, 0x11, 0x14, 0x13, 0x00, 0x00],
                [0x15, 0x80, 0x00, 0x22, 0x21, 0x24, 0x23, 0x00],
                [0x26, 0x25, 0x28, 0x27, 0x00, 0x00, 0x00, 0x00],
            ]
        );
    }

    #[test]
    fn test_unknown_frame_index() {
        assert_eq!(bus_frame(BASE, BUS_FRAME_COUNT, &telemetry()), None);
    }

    #[test]
    fn test_decode_needs_complete_cycle() {
        let frames = bus_frames(BASE, &telemetry());
        assert_eq!(decode_bus_frames(BASE, &frames), Some(telemetry()));

        let (_, partial) = frames.split_last().unwrap();
        assert_eq!(decode_bus_frames(BASE, partial), None);
        assert_eq!(decode_bus_frames(BASE + 1, &frames), None);
    }

    #[test]
    fn test_identifiers_near_u32_max() {
        let telemetry = telemetry();
        let base = u32::MAX - 2;

        assert_eq!(
            bus_frame(base, 2, &telemetry).map(|frame| frame.identifier),
            Some(u32::MAX)
        );
        assert_eq!(bus_frame(base, 3, &telemetry), None);
        assert_eq!(bus_frame(u32::MAX, 1, &telemetry), None);

        let frames = bus_frames(base, &telemetry);
        assert_eq!(frames.get(3), Some(&Frame::default()));
        assert_eq!(decode_bus_frames(base, &frames), None);
        assert_eq!(decode_bus_frames(u32::MAX, &frames), None);
    }

    #[test]
    fn test_wireless_frame() {
        let frame = wireless_frame(BASE, 4999);
        assert_eq!(frame.identifier, BASE);
        assert_eq!(frame.payload, [0x87, 0x13, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_temperature_saturates() {
        assert_eq!(temperature_byte(130), 127);
        assert_eq!(temperature_byte(-128), -128);
        assert_eq!(temperature_byte(-300), -128);
        assert_eq!(temperature_byte(25), 25);
    }
}
