//! Quattro driver ROM data tables.
//!
//! Five lookup tables that resolve abstract parameter codes into the exact
//! numeric values the sound MCU feeds to the wavetable hardware. The contents
//! were captured from the C74/C75/C76 driver ROMs and must stay bit-identical
//! to them; none of these values are computed at runtime.
//!
//! Several tables carry an *out-of-bounds tail*: the original firmware
//! performed no bounds check, so indexing past a table's nominal end read
//! whatever bytes happened to follow it in ROM. Real songs depend on those
//! reads (e.g. out-of-range envelope deltas and pitch codes), so the tail
//! entries are captured here as authoritative data, not error conditions.
//!
//! Note that table placement differs between driver revisions and the two MCU
//! families disagree on byte order, so tail contents are revision-specific;
//! this data matches the C74/C75/C76 layout.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;
use std::fmt;

/// Nominal length of the envelope rate table (codes used by well-formed songs).
pub const ENVELOPE_RATE_NOMINAL_LEN: usize = 0x80;

/// Nominal length of the pitch table (eight octaves of semitones).
pub const PITCH_NOMINAL_LEN: usize = 0x60;

/// Envelope rate table.
///
/// Maps an envelope rate code to the per-tick accumulator delta. Entries
/// `0x80..0xA0` are the out-of-bounds tail (byte pairs from the data that
/// follows the table in ROM).
pub const ENVELOPE_RATE_TABLE: [u16; 0xA0] = [
    0x0000, 0x0001, 0x0002, 0x0003, 0x0004, 0x0005, 0x0007, 0x0009, // 0x00
    0x000B, 0x000D, 0x000F, 0x0011, 0x0013, 0x0015, 0x0017, 0x0019,
    0x001B, 0x001D, 0x001F, 0x0022, 0x0024, 0x0027, 0x002A, 0x002D, // 0x10
    0x0030, 0x0033, 0x0037, 0x003B, 0x0040, 0x0044, 0x0049, 0x004F,
    0x0054, 0x005A, 0x0061, 0x0068, 0x0070, 0x0078, 0x0081, 0x008A, // 0x20
    0x0094, 0x009F, 0x00AA, 0x00B7, 0x00C4, 0x00D2, 0x00E1, 0x00F2,
    0x0103, 0x0116, 0x012A, 0x0140, 0x0157, 0x0170, 0x018B, 0x01AB, // 0x30
    0x01C7, 0x01E8, 0x020B, 0x0231, 0x025A, 0x0285, 0x02B4, 0x02E6,
    0x031C, 0x0356, 0x0394, 0x03D6, 0x041D, 0x046A, 0x04BC, 0x0514, // 0x40
    0x0572, 0x05D7, 0x0644, 0x06B8, 0x0735, 0x07BA, 0x084A, 0x08E4,
    0x0989, 0x0A3A, 0x0AF8, 0x0BC3, 0x0C9E, 0x0D88, 0x0E83, 0x0F91, // 0x50
    0x10B2, 0x11E8, 0x1334, 0x1498, 0x1617, 0x17B1, 0x1969, 0x1B40,
    0x1D3A, 0x1F59, 0x219F, 0x240F, 0x26AC, 0x297A, 0x2C7C, 0x2FB6, // 0x60
    0x332B, 0x36E1, 0x3ADC, 0x3F20, 0x43B4, 0x489D, 0x4DE1, 0x5386,
    0x5995, 0x6014, 0x670B, 0x6E84, 0x7687, 0x7F1F, 0x8857, 0x923A, // 0x70
    0x9CD4, 0xA833, 0xB465, 0xC17A, 0xCF81, 0xDE8D, 0xEEB0, 0xFFFF,
    // Out-of-bounds tail
    0x0000, 0x0101, 0x0201, 0x0303, 0x0504, 0x0706, 0x0807, 0x0A09, // 0x80
    0x0D0B, 0x0F0E, 0x1110, 0x1412, 0x1615, 0x1918, 0x1C1A, 0x1F1D,
    0x2521, 0x2C28, 0x3430, 0x3D38, 0x4641, 0x514C, 0x5D57, 0x6A63, // 0x90
    0x7871, 0x8770, 0x988F, 0xAAA1, 0xBDB3, 0xD2C7, 0xE8DC, 0xFFF3,
];

/// Pitch table.
///
/// Maps a note code to the phase increment for that semitone. The curve
/// approximates `0x80 * 2^(n/12)` but the ROM values are authoritative;
/// entries `0x60..0x6C` extend past the nominal eight octaves.
pub const PITCH_TABLE: [u16; 0x6C] = [
    0x0088, 0x0090, 0x0098, 0x00A1, 0x00AB, 0x00B5, 0x00C0, 0x00CB, // 0x00
    0x00D7, 0x00E4, 0x00F2, 0x0100, 0x010F, 0x011F, 0x0130, 0x0143,
    0x0156, 0x016A, 0x0180, 0x0196, 0x01AF, 0x01C8, 0x01E3, 0x0200, // 0x10
    0x021E, 0x023F, 0x0261, 0x0285, 0x02AB, 0x02D4, 0x02FF, 0x032D,
    0x035D, 0x0390, 0x03C7, 0x0400, 0x043D, 0x047D, 0x04C2, 0x050A, // 0x20
    0x0557, 0x05A8, 0x05FE, 0x0659, 0x06BA, 0x0721, 0x078D, 0x0800,
    0x087A, 0x08FB, 0x0983, 0x0A14, 0x0AAE, 0x0B50, 0x0BFD, 0x0CB3, // 0x30
    0x0D74, 0x0E41, 0x0F1A, 0x1000, 0x10F4, 0x11F6, 0x1307, 0x1429,
    0x155B, 0x16A1, 0x17F9, 0x1966, 0x1AE9, 0x1C82, 0x1E34, 0x2000, // 0x40
    0x21E7, 0x23EB, 0x260E, 0x2851, 0x2AB7, 0x2D41, 0x2FF2, 0x32CC,
    0x35D1, 0x3904, 0x3C68, 0x4000, 0x43CE, 0x47D6, 0x4C1C, 0x50A3, // 0x50
    0x556E, 0x5A82, 0x5FE4, 0x6598, 0x6BA2, 0x7209, 0x78D1, 0x8000,
    0x879C, 0x8FAC, 0x9837, 0xA145, 0xAADB, 0xB504, 0xBFC8, 0xCB2F, // 0x60
    0xD744, 0xE411, 0xF1A1, 0xFFFF,
];

/// LFO waveform table.
///
/// Sixteen-entry waveform segments, each word packing an amplitude step and
/// a duration/flag nibble. Eleven waveforms back to back.
pub const LFO_WAVE_TABLE: [u16; 0xB0] = [
    0x0013, 0x2510, 0x440B, 0x5904, 0x6084, 0x598B, 0x4490, 0x2593, // 0x00
    0x0093, 0xDB90, 0xBC8B, 0xA784, 0xA004, 0xA70B, 0xBC10, 0xDB13,
    0x000C, 0x180C, 0x300C, 0x480C, 0x608C, 0x488C, 0x308C, 0x188C, // 0x10
    0x008C, 0xE88C, 0xD08C, 0xB88C, 0xA00C, 0xB80C, 0xD00C, 0xE80C,
    0x6000, 0x6000, 0x6000, 0x6000, 0x6000, 0x6000, 0x6000, 0x6000, // 0x20
    0xA000, 0xA000, 0xA000, 0xA000, 0xA000, 0xA000, 0xA000, 0xA000,
    0x6000, 0x6000, 0x6000, 0x6000, 0x6000, 0x6000, 0x6000, 0x6000, // 0x30
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
    0xA000, 0xA000, 0xA000, 0xA000, 0xA000, 0xA000, 0xA000, 0xA000, // 0x40
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
    0x0003, 0x0603, 0x0C03, 0x1203, 0x1803, 0x1E03, 0x2403, 0x2A03, // 0x50
    0x3003, 0x3603, 0x3C03, 0x4203, 0x4803, 0x4E03, 0x5403, 0x5A03,
    0x0083, 0xFA83, 0xF483, 0xEE83, 0xE883, 0xE283, 0xDC83, 0xD683, // 0x60
    0xD083, 0xCA83, 0xC483, 0xBE83, 0xB883, 0xB283, 0xAC83, 0xA683,
    0x5A83, 0x5483, 0x4E83, 0x4883, 0x4283, 0x3C83, 0x3683, 0x3083, // 0x70
    0x2A83, 0x2483, 0x1E83, 0x1883, 0x1283, 0x0C83, 0x0683, 0x0083,
    0xA603, 0xAC03, 0xB203, 0xB803, 0xBE03, 0xC403, 0xCA03, 0xD003, // 0x80
    0xD603, 0xDC03, 0xE203, 0xE803, 0xEE03, 0xF403, 0xFA03, 0x0003,
    0x6000, 0x6000, 0x0000, 0x0000, 0x6000, 0x6000, 0x0000, 0x0000, // 0x90
    0xA000, 0xA000, 0x0000, 0x0000, 0xA000, 0xA000, 0x0000, 0x0000,
    0x0006, 0x0C06, 0x1806, 0x2406, 0x3006, 0x3C06, 0x4806, 0x5406, // 0xa0
    0x0086, 0xF486, 0xE886, 0xDC86, 0xD086, 0xC486, 0xB886, 0xAC86,
];

/// Pan curve table.
///
/// Maps a 6-bit pan position to the per-side attenuation factor.
pub const PAN_TABLE: [u8; 0x40] = [
    0x00, 0x00, 0x01, 0x01, 0x01, 0x02, 0x03, 0x03, // 0x00
    0x04, 0x05, 0x06, 0x07, 0x07, 0x08, 0x09, 0x0A,
    0x0B, 0x0D, 0x0E, 0x0F, 0x10, 0x11, 0x12, 0x14, // 0x10
    0x15, 0x16, 0x18, 0x19, 0x1A, 0x1C, 0x1D, 0x1F,
    0x21, 0x25, 0x28, 0x2C, 0x30, 0x34, 0x38, 0x3D, // 0x20
    0x41, 0x46, 0x4C, 0x51, 0x57, 0x5D, 0x63, 0x6A,
    0x71, 0x78, 0x80, 0x87, 0x8F, 0x98, 0xA1, 0xAA, // 0x30
    0xB3, 0xBD, 0xC7, 0xD2, 0xDC, 0xE8, 0xF3, 0xFF,
];

/// Volume curve table.
///
/// Maps a volume/attenuation code (0 = loudest) to the linear amplitude the
/// hardware mixes with; descends from 0xFF to full silence at code 0xFF.
pub const VOLUME_TABLE: [u8; 0x100] = [
    0xFF, 0xFB, 0xF6, 0xF0, 0xEB, 0xE7, 0xE2, 0xDD, // 0x00
    0xD9, 0xD4, 0xD0, 0xCB, 0xC7, 0xC3, 0xBF, 0xBB,
    0xB7, 0xB3, 0xB0, 0xAC, 0xA8, 0xA5, 0xA2, 0x9E, // 0x10
    0x9B, 0x98, 0x95, 0x91, 0x8E, 0x8C, 0x89, 0x86,
    0x83, 0x80, 0x7E, 0x7B, 0x78, 0x76, 0x74, 0x71, // 0x20
    0x6F, 0x6D, 0x6A, 0x68, 0x66, 0x64, 0x62, 0x60,
    0x5E, 0x5C, 0x5A, 0x58, 0x56, 0x54, 0x53, 0x51, // 0x30
    0x4F, 0x4E, 0x4C, 0x4A, 0x49, 0x47, 0x46, 0x44,
    0x43, 0x42, 0x40, 0x3F, 0x3E, 0x3C, 0x3B, 0x3A, // 0x40
    0x39, 0x38, 0x36, 0x35, 0x34, 0x33, 0x32, 0x31,
    0x30, 0x2F, 0x2E, 0x2D, 0x2C, 0x2B, 0x2A, 0x29, // 0x50
    0x29, 0x28, 0x27, 0x26, 0x25, 0x25, 0x24, 0x23,
    0x22, 0x22, 0x21, 0x20, 0x20, 0x1F, 0x1E, 0x1E, // 0x60
    0x1D, 0x1C, 0x1C, 0x1B, 0x1B, 0x1A, 0x1A, 0x19,
    0x19, 0x18, 0x18, 0x17, 0x17, 0x16, 0x16, 0x15, // 0x70
    0x15, 0x14, 0x14, 0x14, 0x13, 0x13, 0x12, 0x12,
    0x12, 0x11, 0x11, 0x10, 0x10, 0x10, 0x0F, 0x0F, // 0x80
    0x0F, 0x0F, 0x0E, 0x0E, 0x0E, 0x0D, 0x0D, 0x0D,
    0x0D, 0x0C, 0x0C, 0x0C, 0x0C, 0x0B, 0x0B, 0x0B, // 0x90
    0x0B, 0x0A, 0x0A, 0x0A, 0x0A, 0x0A, 0x09, 0x09,
    0x09, 0x09, 0x09, 0x08, 0x08, 0x08, 0x08, 0x08, // 0xa0
    0x08, 0x07, 0x07, 0x07, 0x07, 0x07, 0x07, 0x07,
    0x06, 0x06, 0x06, 0x06, 0x06, 0x06, 0x06, 0x06, // 0xb0
    0x05, 0x05, 0x05, 0x05, 0x05, 0x05, 0x05, 0x05,
    0x05, 0x05, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04, // 0xc0
    0x04, 0x04, 0x04, 0x04, 0x04, 0x04, 0x03, 0x03,
    0x03, 0x03, 0x03, 0x03, 0x03, 0x03, 0x03, 0x03, // 0xd0
    0x03, 0x03, 0x03, 0x03, 0x03, 0x03, 0x02, 0x02,
    0x02, 0x02, 0x02, 0x02, 0x02, 0x02, 0x02, 0x02, // 0xe0
    0x02, 0x02, 0x02, 0x02, 0x02, 0x02, 0x02, 0x02,
    0x02, 0x02, 0x02, 0x02, 0x02, 0x02, 0x01, 0x01, // 0xf0
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x00,
];

/// Parameter table selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
pub enum ParamTable {
    /// Envelope rate deltas (16-bit, with out-of-bounds tail).
    EnvelopeRate = 0,
    /// Semitone pitch steps (16-bit, with out-of-bounds tail).
    Pitch = 1,
    /// LFO waveform segments (16-bit).
    LfoWave = 2,
    /// Pan attenuation curve (8-bit).
    Pan = 3,
    /// Volume attenuation curve (8-bit).
    Volume = 4,
}

impl ParamTable {
    /// Convert a raw table selector code (0-4) to a `ParamTable`.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_u8(code)
    }

    /// Physical length of the table, including any out-of-bounds tail.
    pub const fn physical_len(self) -> usize {
        match self {
            ParamTable::EnvelopeRate => ENVELOPE_RATE_TABLE.len(),
            ParamTable::Pitch => PITCH_TABLE.len(),
            ParamTable::LfoWave => LFO_WAVE_TABLE.len(),
            ParamTable::Pan => PAN_TABLE.len(),
            ParamTable::Volume => VOLUME_TABLE.len(),
        }
    }

    /// Nominal length: the range well-formed song data is expected to use.
    ///
    /// This is a documentation boundary, not a runtime one; `resolve` serves
    /// nominal and tail entries from the same flat storage.
    pub const fn nominal_len(self) -> usize {
        match self {
            ParamTable::EnvelopeRate => ENVELOPE_RATE_NOMINAL_LEN,
            ParamTable::Pitch => PITCH_NOMINAL_LEN,
            ParamTable::LfoWave => LFO_WAVE_TABLE.len(),
            ParamTable::Pan => PAN_TABLE.len(),
            ParamTable::Volume => VOLUME_TABLE.len(),
        }
    }

    /// Natural element width of the table in bits (8 or 16).
    pub const fn element_bits(self) -> u32 {
        match self {
            ParamTable::EnvelopeRate | ParamTable::Pitch | ParamTable::LfoWave => 16,
            ParamTable::Pan | ParamTable::Volume => 8,
        }
    }

    /// Resolve a parameter code to its hardware output value.
    ///
    /// Eight-bit tables widen to `u16`. Indices at or beyond the physical
    /// length wrap modulo the physical length; this policy is applied
    /// uniformly to all five tables. (What the silicon did past the captured
    /// tail is unobservable, so the wrap is a deliberate choice rather than
    /// an emulation claim.)
    pub fn resolve(self, index: usize) -> u16 {
        let index = index % self.physical_len();
        match self {
            ParamTable::EnvelopeRate => ENVELOPE_RATE_TABLE[index],
            ParamTable::Pitch => PITCH_TABLE[index],
            ParamTable::LfoWave => LFO_WAVE_TABLE[index],
            ParamTable::Pan => u16::from(PAN_TABLE[index]),
            ParamTable::Volume => u16::from(VOLUME_TABLE[index]),
        }
    }
}

impl fmt::Display for ParamTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamTable::EnvelopeRate => "envelope rate",
            ParamTable::Pitch => "pitch",
            ParamTable::LfoWave => "LFO wave",
            ParamTable::Pan => "pan",
            ParamTable::Volume => "volume",
        };
        f.write_str(name)
    }
}

/// All five tables, in selector-code order.
pub const ALL_TABLES: [ParamTable; 5] = [
    ParamTable::EnvelopeRate,
    ParamTable::Pitch,
    ParamTable::LfoWave,
    ParamTable::Pan,
    ParamTable::Volume,
];
