//! Fixed-size channel sample records
//!
//! Every polled input channel is stored as a 7-byte record: one tag byte
//! naming the channel followed by a 6-byte payload. Payload fields are packed
//! with explicit shifts and masks in little-endian order so a movie decodes
//! identically on every host.
//!
//! ```text
//! tag  payload (bytes 1..7)
//! 0    PadAndCircle     u32 word: buttons 0-15, circle x 16-23, circle y 24-31
//! 1    Touch            x: u16, y: u16, valid: u8
//! 2    Accelerometer    x: i16, y: i16, z: i16
//! 3    Gyroscope        x: i16, y: i16, z: i16
//! 4    CStick           x: i8, y: i8, zl: u8, zr: u8
//! 5    CirclePadDevice  u32 word: battery 0-4, zl/zr/r not held 5-7,
//!                       c-stick x 8-19, c-stick y 20-31
//! ```
//!
//! Unused payload bytes are always written as zero and ignored on decode.

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};

use crate::hid::{
    AccelerometerDataEntry, CirclePadResponse, GyroscopeDataEntry, IrPadState, PadState,
    TouchDataEntry,
};

/// Size of one encoded sample, tag included
pub const RECORD_SIZE: usize = 7;

/// One encoded sample
pub type Record = [u8; RECORD_SIZE];

/// Pad buttons in record bit order (bit 0 first)
const PAD_RECORD_LAYOUT: [PadState; 16] = [
    PadState::A,
    PadState::B,
    PadState::SELECT,
    PadState::START,
    PadState::RIGHT,
    PadState::LEFT,
    PadState::UP,
    PadState::DOWN,
    PadState::R,
    PadState::L,
    PadState::X,
    PadState::Y,
    PadState::CIRCLE_RIGHT,
    PadState::CIRCLE_LEFT,
    PadState::CIRCLE_UP,
    PadState::CIRCLE_DOWN,
];

const BATTERY_MASK: u32 = 0x1F;
const C_STICK_AXIS_MASK: u32 = 0xFFF;

/// Input channel a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ChannelKind {
    PadAndCircle = 0,
    Touch = 1,
    Accelerometer = 2,
    Gyroscope = 3,
    CStick = 4,
    CirclePadDevice = 5,
}

impl ChannelKind {
    /// All channel kinds in tag order
    pub const ALL: [ChannelKind; 6] = [
        ChannelKind::PadAndCircle,
        ChannelKind::Touch,
        ChannelKind::Accelerometer,
        ChannelKind::Gyroscope,
        ChannelKind::CStick,
        ChannelKind::CirclePadDevice,
    ];

    /// Tag byte written at offset 0 of a record
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Look up a channel by its tag byte
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            ChannelKind::PadAndCircle => "PadAndCircle",
            ChannelKind::Touch => "Touch",
            ChannelKind::Accelerometer => "Accelerometer",
            ChannelKind::Gyroscope => "Gyroscope",
            ChannelKind::CStick => "CStick",
            ChannelKind::CirclePadDevice => "CirclePadDevice",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure to turn a record into live input
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Tag byte does not name any channel
    #[error("unknown channel tag {0}")]
    UnknownChannel(u8),

    /// Record belongs to a different channel than the one being polled
    #[error("expected a {expected} record, found {found}")]
    ChannelMismatch {
        expected: ChannelKind,
        found: ChannelKind,
    },
}

/// Decoded snapshot of one channel for one frame
///
/// Field widths match the record layout, so every value a sample can hold
/// survives an encode/decode cycle unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSample {
    PadAndCircle {
        /// Only the 16 recorded buttons are ever set
        buttons: PadState,
        circle_x: i8,
        circle_y: i8,
    },
    Touch {
        x: u16,
        y: u16,
        valid: bool,
    },
    Accelerometer {
        x: i16,
        y: i16,
        z: i16,
    },
    Gyroscope {
        x: i16,
        y: i16,
        z: i16,
    },
    CStick {
        x: i8,
        y: i8,
        zl: bool,
        zr: bool,
    },
    CirclePadDevice {
        /// 5-bit field
        battery_level: u8,
        zl_not_held: bool,
        zr_not_held: bool,
        r_not_held: bool,
        /// 12-bit field
        c_stick_x: u16,
        /// 12-bit field
        c_stick_y: u16,
    },
}

/// Buttons a pad record can carry
pub fn recorded_pad_buttons() -> PadState {
    PAD_RECORD_LAYOUT
        .iter()
        .fold(PadState::empty(), |acc, flag| acc | *flag)
}

fn saturate_axis(value: i16, channel: ChannelKind) -> i8 {
    let clamped = value.clamp(i8::MIN as i16, i8::MAX as i16) as i8;
    if clamped as i16 != value {
        tracing::debug!("{} axis {} saturated to {}", channel, value, clamped);
    }
    clamped
}

fn mask_field(value: u32, mask: u32, channel: ChannelKind) -> u32 {
    let masked = value & mask;
    if masked != value {
        tracing::debug!("{} field {:#x} masked to {:#x}", channel, value, masked);
    }
    masked
}

impl ChannelSample {
    /// Channel this sample belongs to
    pub fn kind(&self) -> ChannelKind {
        match self {
            ChannelSample::PadAndCircle { .. } => ChannelKind::PadAndCircle,
            ChannelSample::Touch { .. } => ChannelKind::Touch,
            ChannelSample::Accelerometer { .. } => ChannelKind::Accelerometer,
            ChannelSample::Gyroscope { .. } => ChannelKind::Gyroscope,
            ChannelSample::CStick { .. } => ChannelKind::CStick,
            ChannelSample::CirclePadDevice { .. } => ChannelKind::CirclePadDevice,
        }
    }

    /// Pack this sample into its 7-byte record
    pub fn encode(&self) -> Record {
        let mut record = [0u8; RECORD_SIZE];
        record[0] = self.kind().tag();
        let payload = &mut record[1..];

        match *self {
            ChannelSample::PadAndCircle {
                buttons,
                circle_x,
                circle_y,
            } => {
                let mut word = 0u32;
                for (bit, flag) in PAD_RECORD_LAYOUT.iter().enumerate() {
                    if buttons.contains(*flag) {
                        word |= 1 << bit;
                    }
                }
                word |= (circle_x as u8 as u32) << 16;
                word |= (circle_y as u8 as u32) << 24;
                LittleEndian::write_u32(&mut payload[0..4], word);
            }
            ChannelSample::Touch { x, y, valid } => {
                LittleEndian::write_u16(&mut payload[0..2], x);
                LittleEndian::write_u16(&mut payload[2..4], y);
                payload[4] = valid as u8;
            }
            ChannelSample::Accelerometer { x, y, z } | ChannelSample::Gyroscope { x, y, z } => {
                LittleEndian::write_i16(&mut payload[0..2], x);
                LittleEndian::write_i16(&mut payload[2..4], y);
                LittleEndian::write_i16(&mut payload[4..6], z);
            }
            ChannelSample::CStick { x, y, zl, zr } => {
                payload[0] = x as u8;
                payload[1] = y as u8;
                payload[2] = zl as u8;
                payload[3] = zr as u8;
            }
            ChannelSample::CirclePadDevice {
                battery_level,
                zl_not_held,
                zr_not_held,
                r_not_held,
                c_stick_x,
                c_stick_y,
            } => {
                let word = (battery_level as u32 & BATTERY_MASK)
                    | (zl_not_held as u32) << 5
                    | (zr_not_held as u32) << 6
                    | (r_not_held as u32) << 7
                    | (c_stick_x as u32 & C_STICK_AXIS_MASK) << 8
                    | (c_stick_y as u32 & C_STICK_AXIS_MASK) << 20;
                LittleEndian::write_u32(&mut payload[0..4], word);
            }
        }

        record
    }

    /// Unpack a record
    pub fn decode(record: &Record) -> Result<Self, DecodeError> {
        let kind = ChannelKind::from_tag(record[0]).ok_or(DecodeError::UnknownChannel(record[0]))?;
        let payload = &record[1..];

        let sample = match kind {
            ChannelKind::PadAndCircle => {
                let word = LittleEndian::read_u32(&payload[0..4]);
                let mut buttons = PadState::empty();
                for (bit, flag) in PAD_RECORD_LAYOUT.iter().enumerate() {
                    buttons.set(*flag, word & (1 << bit) != 0);
                }
                ChannelSample::PadAndCircle {
                    buttons,
                    circle_x: (word >> 16) as u8 as i8,
                    circle_y: (word >> 24) as u8 as i8,
                }
            }
            ChannelKind::Touch => ChannelSample::Touch {
                x: LittleEndian::read_u16(&payload[0..2]),
                y: LittleEndian::read_u16(&payload[2..4]),
                valid: payload[4] != 0,
            },
            ChannelKind::Accelerometer => ChannelSample::Accelerometer {
                x: LittleEndian::read_i16(&payload[0..2]),
                y: LittleEndian::read_i16(&payload[2..4]),
                z: LittleEndian::read_i16(&payload[4..6]),
            },
            ChannelKind::Gyroscope => ChannelSample::Gyroscope {
                x: LittleEndian::read_i16(&payload[0..2]),
                y: LittleEndian::read_i16(&payload[2..4]),
                z: LittleEndian::read_i16(&payload[4..6]),
            },
            ChannelKind::CStick => ChannelSample::CStick {
                x: payload[0] as i8,
                y: payload[1] as i8,
                zl: payload[2] != 0,
                zr: payload[3] != 0,
            },
            ChannelKind::CirclePadDevice => {
                let word = LittleEndian::read_u32(&payload[0..4]);
                ChannelSample::CirclePadDevice {
                    battery_level: (word & BATTERY_MASK) as u8,
                    zl_not_held: word & (1 << 5) != 0,
                    zr_not_held: word & (1 << 6) != 0,
                    r_not_held: word & (1 << 7) != 0,
                    c_stick_x: ((word >> 8) & C_STICK_AXIS_MASK) as u16,
                    c_stick_y: ((word >> 20) & C_STICK_AXIS_MASK) as u16,
                }
            }
        };

        Ok(sample)
    }

    // Capture from live state. Values wider than the record fields are
    // saturated (axes) or masked (bit fields).

    pub fn from_pad_and_circle(pad: PadState, circle_x: i16, circle_y: i16) -> Self {
        ChannelSample::PadAndCircle {
            buttons: pad & recorded_pad_buttons(),
            circle_x: saturate_axis(circle_x, ChannelKind::PadAndCircle),
            circle_y: saturate_axis(circle_y, ChannelKind::PadAndCircle),
        }
    }

    pub fn from_touch(touch: &TouchDataEntry) -> Self {
        ChannelSample::Touch {
            x: touch.x,
            y: touch.y,
            valid: touch.valid,
        }
    }

    pub fn from_accelerometer(accel: &AccelerometerDataEntry) -> Self {
        ChannelSample::Accelerometer {
            x: accel.x,
            y: accel.y,
            z: accel.z,
        }
    }

    pub fn from_gyroscope(gyro: &GyroscopeDataEntry) -> Self {
        ChannelSample::Gyroscope {
            x: gyro.x,
            y: gyro.y,
            z: gyro.z,
        }
    }

    pub fn from_c_stick(pad: IrPadState, c_stick_x: i16, c_stick_y: i16) -> Self {
        ChannelSample::CStick {
            x: saturate_axis(c_stick_x, ChannelKind::CStick),
            y: saturate_axis(c_stick_y, ChannelKind::CStick),
            zl: pad.contains(IrPadState::ZL),
            zr: pad.contains(IrPadState::ZR),
        }
    }

    pub fn from_circle_pad(response: &CirclePadResponse) -> Self {
        let kind = ChannelKind::CirclePadDevice;
        ChannelSample::CirclePadDevice {
            battery_level: mask_field(response.battery_level as u32, BATTERY_MASK, kind) as u8,
            zl_not_held: response.zl_not_held,
            zr_not_held: response.zr_not_held,
            r_not_held: response.r_not_held,
            c_stick_x: mask_field(response.c_stick_x as u32, C_STICK_AXIS_MASK, kind) as u16,
            c_stick_y: mask_field(response.c_stick_y as u32, C_STICK_AXIS_MASK, kind) as u16,
        }
    }

    fn mismatch(&self, expected: ChannelKind) -> DecodeError {
        DecodeError::ChannelMismatch {
            expected,
            found: self.kind(),
        }
    }

    // Write back into live state. Only recorded fields are touched; a sample
    // of another channel leaves the state alone and reports the mismatch.

    pub fn apply_pad_and_circle(
        &self,
        pad: &mut PadState,
        circle_x: &mut i16,
        circle_y: &mut i16,
    ) -> Result<(), DecodeError> {
        match *self {
            ChannelSample::PadAndCircle {
                buttons,
                circle_x: x,
                circle_y: y,
            } => {
                for flag in PAD_RECORD_LAYOUT {
                    pad.set(flag, buttons.contains(flag));
                }
                *circle_x = x as i16;
                *circle_y = y as i16;
                Ok(())
            }
            _ => Err(self.mismatch(ChannelKind::PadAndCircle)),
        }
    }

    pub fn apply_touch(&self, touch: &mut TouchDataEntry) -> Result<(), DecodeError> {
        match *self {
            ChannelSample::Touch { x, y, valid } => {
                *touch = TouchDataEntry { x, y, valid };
                Ok(())
            }
            _ => Err(self.mismatch(ChannelKind::Touch)),
        }
    }

    pub fn apply_accelerometer(
        &self,
        accel: &mut AccelerometerDataEntry,
    ) -> Result<(), DecodeError> {
        match *self {
            ChannelSample::Accelerometer { x, y, z } => {
                *accel = AccelerometerDataEntry { x, y, z };
                Ok(())
            }
            _ => Err(self.mismatch(ChannelKind::Accelerometer)),
        }
    }

    pub fn apply_gyroscope(&self, gyro: &mut GyroscopeDataEntry) -> Result<(), DecodeError> {
        match *self {
            ChannelSample::Gyroscope { x, y, z } => {
                *gyro = GyroscopeDataEntry { x, y, z };
                Ok(())
            }
            _ => Err(self.mismatch(ChannelKind::Gyroscope)),
        }
    }

    pub fn apply_c_stick(
        &self,
        pad: &mut IrPadState,
        c_stick_x: &mut i16,
        c_stick_y: &mut i16,
    ) -> Result<(), DecodeError> {
        match *self {
            ChannelSample::CStick { x, y, zl, zr } => {
                *c_stick_x = x as i16;
                *c_stick_y = y as i16;
                pad.set(IrPadState::ZL, zl);
                pad.set(IrPadState::ZR, zr);
                Ok(())
            }
            _ => Err(self.mismatch(ChannelKind::CStick)),
        }
    }

    pub fn apply_circle_pad(&self, response: &mut CirclePadResponse) -> Result<(), DecodeError> {
        match *self {
            ChannelSample::CirclePadDevice {
                battery_level,
                zl_not_held,
                zr_not_held,
                r_not_held,
                c_stick_x,
                c_stick_y,
            } => {
                *response = CirclePadResponse {
                    battery_level,
                    zl_not_held,
                    zr_not_held,
                    r_not_held,
                    c_stick_x,
                    c_stick_y,
                };
                Ok(())
            }
            _ => Err(self.mismatch(ChannelKind::CirclePadDevice)),
        }
    }
}

impl fmt::Display for ChannelSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ChannelSample::PadAndCircle {
                buttons,
                circle_x,
                circle_y,
            } => {
                let names: Vec<&str> = buttons.iter_names().map(|(name, _)| name).collect();
                let names = if names.is_empty() {
                    "-".to_string()
                } else {
                    names.join("+")
                };
                write!(f, "PadAndCircle buttons={} circle=({}, {})", names, circle_x, circle_y)
            }
            ChannelSample::Touch { x, y, valid } => {
                write!(f, "Touch ({}, {}) valid={}", x, y, valid)
            }
            ChannelSample::Accelerometer { x, y, z } => {
                write!(f, "Accelerometer ({}, {}, {})", x, y, z)
            }
            ChannelSample::Gyroscope { x, y, z } => write!(f, "Gyroscope ({}, {}, {})", x, y, z),
            ChannelSample::CStick { x, y, zl, zr } => {
                write!(f, "CStick ({}, {}) zl={} zr={}", x, y, zl, zr)
            }
            ChannelSample::CirclePadDevice {
                battery_level,
                zl_not_held,
                zr_not_held,
                r_not_held,
                c_stick_x,
                c_stick_y,
            } => write!(
                f,
                "CirclePadDevice battery={} c_stick=({}, {}) zl_not_held={} zr_not_held={} r_not_held={}",
                battery_level, c_stick_x, c_stick_y, zl_not_held, zr_not_held, r_not_held
            ),
        }
    }
}
