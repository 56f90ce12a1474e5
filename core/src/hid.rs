//! Live input structures owned by the HID and IR services
//!
//! These are the per-frame states the movie hooks read while recording and
//! overwrite while playing back. Bit positions follow the hardware pad words,
//! not the movie record layout; the codec maps between the two explicitly.

bitflags::bitflags! {
    /// HID pad word (buttons, D-pad and circle pad directions)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct PadState: u32 {
        const A = 1 << 0;
        const B = 1 << 1;
        const SELECT = 1 << 2;
        const START = 1 << 3;
        const RIGHT = 1 << 4;
        const LEFT = 1 << 5;
        const UP = 1 << 6;
        const DOWN = 1 << 7;
        const R = 1 << 8;
        const L = 1 << 9;
        const X = 1 << 10;
        const Y = 1 << 11;
        /// Not captured by movies
        const DEBUG = 1 << 12;
        /// Not captured by movies
        const GPIO14 = 1 << 13;
        const CIRCLE_RIGHT = 1 << 28;
        const CIRCLE_LEFT = 1 << 29;
        const CIRCLE_UP = 1 << 30;
        const CIRCLE_DOWN = 1 << 31;
    }
}

bitflags::bitflags! {
    /// IR pad word reported by the extra button accessory
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct IrPadState: u32 {
        const ZL = 1 << 14;
        const ZR = 1 << 15;
    }
}

/// Single touch screen sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchDataEntry {
    pub x: u16,
    pub y: u16,
    pub valid: bool,
}

/// Raw accelerometer axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccelerometerDataEntry {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// Raw gyroscope axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GyroscopeDataEntry {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// Circle Pad Pro response (extended pad)
///
/// `battery_level` is a 5-bit field and the C-stick axes are 12-bit fields
/// on the wire; wider values are masked when recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CirclePadResponse {
    pub battery_level: u8,
    pub zl_not_held: bool,
    pub zr_not_held: bool,
    pub r_not_held: bool,
    pub c_stick_x: u16,
    pub c_stick_y: u16,
}
