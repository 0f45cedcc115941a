//! Parity tests for the ROM parameter tables.
//!
//! The golden values here were transcribed independently from a C74 ROM dump
//! and cross-checked against the driver disassembly. Whole-table integrity is
//! pinned by additive and xor checksums; the spot checks cover the entries
//! real songs are known to depend on, including out-of-bounds reads.

use quattro::tables::{
    ParamTable, ALL_TABLES, ENVELOPE_RATE_TABLE, LFO_WAVE_TABLE, PAN_TABLE, PITCH_TABLE,
    VOLUME_TABLE,
};

fn checksums(table: ParamTable) -> (u64, u16) {
    let mut sum = 0u64;
    let mut xor = 0u16;
    for i in 0..table.physical_len() {
        let v = table.resolve(i);
        sum += u64::from(v);
        xor ^= v;
    }
    (sum, xor)
}

#[test]
fn envelope_rate_table_integrity() {
    assert_eq!(ENVELOPE_RATE_TABLE.len(), 0xA0);
    assert_eq!(checksums(ParamTable::EnvelopeRate), (0x17_77A5, 0xE419));
}

#[test]
fn pitch_table_integrity() {
    assert_eq!(PITCH_TABLE.len(), 0x6C);
    assert_eq!(checksums(ParamTable::Pitch), (0x11_C83B, 0xEF19));
}

#[test]
fn lfo_wave_table_integrity() {
    assert_eq!(LFO_WAVE_TABLE.len(), 0xB0);
    assert_eq!(checksums(ParamTable::LfoWave), (0x47_1EA8, 0xE000));
}

#[test]
fn pan_table_integrity() {
    assert_eq!(PAN_TABLE.len(), 0x40);
    assert_eq!(checksums(ParamTable::Pan), (0x10C6, 0x20));
}

#[test]
fn volume_table_integrity() {
    assert_eq!(VOLUME_TABLE.len(), 0x100);
    assert_eq!(checksums(ParamTable::Volume), (0x300E, 0x58));
}

#[test]
fn envelope_rate_spot_values() {
    let t = ParamTable::EnvelopeRate;
    assert_eq!(t.resolve(0x00), 0x0000);
    assert_eq!(t.resolve(0x10), 0x001B);
    assert_eq!(t.resolve(0x40), 0x031C);
    assert_eq!(t.resolve(0x7F), 0xFFFF);
    // Out-of-bounds tail: byte pairs of the data following the table in ROM.
    assert_eq!(t.resolve(0x80), 0x0000);
    assert_eq!(t.resolve(0x81), 0x0101);
    assert_eq!(t.resolve(0x90), 0x2521);
    assert_eq!(t.resolve(0x9F), 0xFFF3);
}

#[test]
fn pitch_spot_values() {
    let t = ParamTable::Pitch;
    assert_eq!(t.resolve(0x00), 0x0088);
    // Octave anchors at exact powers of two.
    assert_eq!(t.resolve(0x0B), 0x0100);
    assert_eq!(t.resolve(0x2F), 0x0800);
    assert_eq!(t.resolve(0x5F), 0x8000);
    // Past the nominal eight octaves (used by e.g. xevi3dg song 0x8e).
    assert_eq!(t.resolve(0x60), 0x879C);
    assert_eq!(t.resolve(0x6B), 0xFFFF);
}

#[test]
fn lfo_wave_spot_values() {
    let t = ParamTable::LfoWave;
    // Sine-ish waveform 0, first and last segments.
    assert_eq!(t.resolve(0x00), 0x0013);
    assert_eq!(t.resolve(0x0F), 0xDB13);
    // Square waveform: constant-amplitude plateaus.
    assert_eq!(t.resolve(0x20), 0x6000);
    assert_eq!(t.resolve(0x28), 0xA000);
    assert_eq!(t.resolve(0xAF), 0xAC86);
}

#[test]
fn pan_and_volume_spot_values() {
    assert_eq!(ParamTable::Pan.resolve(0x00), 0x00);
    assert_eq!(ParamTable::Pan.resolve(0x32), 0x80);
    assert_eq!(ParamTable::Pan.resolve(0x3F), 0xFF);

    assert_eq!(ParamTable::Volume.resolve(0x00), 0xFF);
    assert_eq!(ParamTable::Volume.resolve(0x21), 0x80);
    assert_eq!(ParamTable::Volume.resolve(0xFF), 0x00);
}

#[test]
fn eight_bit_tables_widen_without_sign_extension() {
    for i in 0..ParamTable::Volume.physical_len() {
        assert!(ParamTable::Volume.resolve(i) <= 0xFF);
    }
    for i in 0..ParamTable::Pan.physical_len() {
        assert!(ParamTable::Pan.resolve(i) <= 0xFF);
    }
}

#[test]
fn wrap_policy_is_uniform() {
    for table in ALL_TABLES {
        let len = table.physical_len();
        for index in [0usize, 1, len - 1] {
            assert_eq!(
                table.resolve(len + index),
                table.resolve(index),
                "{table} table wrap at index 0x{index:02x}"
            );
        }
    }
}
