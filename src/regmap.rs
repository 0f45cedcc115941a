//! Field maps over the driver's track and channel control blocks.
//!
//! The sequencer driver keeps one control block per track and per channel.
//! Driver commands (and the inspector) address their fields through a flat
//! register-offset space rather than through struct members, so each entity
//! kind carries an exposure table: one optional [`FieldDescriptor`] per
//! register offset, naming the field and describing how its bytes are laid
//! out in the block.
//!
//! Offsets that would reach sequence pointers or other internal bookkeeping
//! have no descriptor at all. Reads of such a slot return zero and writes are
//! discarded, so a runaway register write can never corrupt pointer-valued
//! state. Absence is explicit (`None` in the table), which keeps the property
//! checkable.
//!
//! Byte order is a property of each descriptor, never of the host: the two
//! MCU families the driver shipped on disagree on word order for the same
//! logical field, so both orders appear within a single map.

use thiserror::Error;

/// Errors reported by [`RegisterMap::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// A descriptor addresses a byte outside the entity's declared size.
    #[error("slot 0x{slot:02x} ({name}) touches offset 0x{offset:02x}, outside entity size 0x{size:02x}")]
    OffsetOutOfBounds {
        /// Register offset of the offending slot.
        slot: usize,
        /// Field name from the descriptor.
        name: &'static str,
        /// The out-of-range byte offset.
        offset: usize,
        /// Declared entity size in bytes.
        size: usize,
    },
}

/// How a field's bytes are stored within its control block.
///
/// Offsets name the exact bytes touched. Word variants carry both offsets,
/// most significant byte first for [`FieldEncoding::WordBe`] and least
/// significant first for [`FieldEncoding::WordLe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEncoding {
    /// A single byte.
    Byte(usize),
    /// A 16-bit word; the first offset holds the most significant byte.
    WordBe(usize, usize),
    /// A 16-bit word; the first offset holds the least significant byte.
    WordLe(usize, usize),
    /// The upper half of a word shared with an unrelated lower half.
    UpperByte(usize),
    /// The lower half of a word shared with an unrelated upper half.
    LowerByte(usize),
}

impl FieldEncoding {
    /// Number of value bits the encoding can represent.
    pub const fn bits(self) -> u32 {
        match self {
            FieldEncoding::WordBe(..) | FieldEncoding::WordLe(..) => 16,
            _ => 8,
        }
    }

    /// The byte offsets this encoding touches.
    fn offsets(self) -> (usize, Option<usize>) {
        match self {
            FieldEncoding::Byte(o)
            | FieldEncoding::UpperByte(o)
            | FieldEncoding::LowerByte(o) => (o, None),
            FieldEncoding::WordBe(a, b) | FieldEncoding::WordLe(a, b) => (a, Some(b)),
        }
    }
}

/// One exposed field of a track or channel control block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Logical field name.
    pub name: &'static str,
    /// Storage encoding and byte offsets.
    pub encoding: FieldEncoding,
}

/// Entity kinds that expose a register map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Sequencer timeline entity (tempo, flags, stack positions).
    Track,
    /// Voice-assignment entity (wave, pitch, envelope, pan).
    Channel,
}

impl EntityKind {
    /// Declared size of this entity's control block in bytes.
    pub const fn block_size(self) -> usize {
        match self {
            EntityKind::Track => TRACK_BLOCK_SIZE,
            EntityKind::Channel => CHANNEL_BLOCK_SIZE,
        }
    }
}

/// Size of a track control block in bytes.
pub const TRACK_BLOCK_SIZE: usize = 0x20;

/// Size of a channel control block in bytes.
pub const CHANNEL_BLOCK_SIZE: usize = 0x20;

/// Number of register offsets a track exposes.
pub const TRACK_SLOT_COUNT: usize = 0x22;

/// Number of register offsets a channel exposes.
pub const CHANNEL_SLOT_COUNT: usize = 0x20;

/// Byte offsets of the track control block fields.
///
/// Fields not listed in the exposure table (update/position/loop pointers)
/// still live in the block; they are reachable only by the driver itself.
pub mod track_layout {
    /// Frame counter for the next track update (u16).
    pub const UPDATE_TIME: usize = 0x00;
    /// Sequence data pointer (u16, internal).
    pub const POSITION: usize = 0x02;
    /// Subroutine return pointer (u16, internal).
    pub const SUB_RETURN: usize = 0x04;
    /// Master track volume (u16, only the low byte is exposed).
    pub const TRACK_VOLUME: usize = 0x06;
    /// Global volume send (u16).
    pub const GLOBAL_VOLUME: usize = 0x08;
    /// Track status flags (u16).
    pub const FLAGS: usize = 0x0A;
    /// Fadeout accumulator (u16).
    pub const FADEOUT: usize = 0x0C;
    /// Sequence bank byte (internal).
    pub const BANK: usize = 0x0E;
    /// Base tempo from the song header.
    pub const BASE_TEMPO: usize = 0x0F;
    /// Fractional tempo accumulator.
    pub const TEMPO_FRACTION: usize = 0x10;
    /// Current tempo.
    pub const TEMPO: usize = 0x11;
    /// Tempo multiplier factor.
    pub const TEMPO_MUL_FACTOR: usize = 0x12;
    /// Tempo update mode.
    pub const TEMPO_MODE: usize = 0x13;
    /// Register number driving the tempo, if any.
    pub const TEMPO_REG: usize = 0x14;
    /// Pending key-on events.
    pub const KEY_ON_BUFFER: usize = 0x15;
    /// Subroutine stack depth.
    pub const SUB_STACK_POS: usize = 0x16;
    /// Repeat stack depth.
    pub const REPEAT_STACK_POS: usize = 0x17;
    /// Loop stack depth.
    pub const LOOP_STACK_POS: usize = 0x18;
    /// Nonzero while the track is skipped.
    pub const SKIP_TRACK: usize = 0x19;
    /// Ticks left in the current rest.
    pub const REST_COUNT: usize = 0x1A;
}

/// Byte offsets of the channel control block fields.
pub mod channel_layout {
    /// Wave (sample) number (u16).
    pub const WAVE_NO: usize = 0x00;
    /// Volume envelope number (u16, halves exposed independently).
    pub const ENV_NO: usize = 0x02;
    /// Pitch envelope number (u16, halves exposed independently).
    pub const PITCH_ENV_NO: usize = 0x04;
    /// Bound voice pointer (u16, internal).
    pub const VOICE_PTR: usize = 0x06;
    /// Source channel pointer (u16, internal).
    pub const SOURCE_PTR: usize = 0x08;
    /// Channel volume.
    pub const VOLUME: usize = 0x0A;
    /// Pan position.
    pub const PAN: usize = 0x0B;
    /// Detune amount.
    pub const DETUNE: usize = 0x0C;
    /// Base note.
    pub const BASE_NOTE: usize = 0x0D;
    /// Ticks to delay note-on.
    pub const NOTE_DELAY: usize = 0x0E;
    /// Gate time.
    pub const GATE_TIME: usize = 0x0F;
    /// Sample start offset.
    pub const SAMPLE_OFFSET: usize = 0x10;
    /// Transpose in semitones.
    pub const TRANSPOSE: usize = 0x11;
    /// LFO waveform number.
    pub const LFO_NO: usize = 0x12;
    /// Portamento speed.
    pub const PORTAMENTO: usize = 0x13;
    /// Pan update mode.
    pub const PAN_MODE: usize = 0x14;
    /// Register number driving the pitch, if any.
    pub const PITCH_REG: usize = 0x15;
    /// Preset map selector.
    pub const PRESET_MAP: usize = 0x16;
    /// Requested voice number.
    pub const VOICE_NO: usize = 0x17;
    /// Legato flag.
    pub const LEGATO: usize = 0x18;
    /// Channel enable flag.
    pub const ENABLED: usize = 0x19;
    /// Linked channel number.
    pub const CHANNEL_LINK: usize = 0x1A;
    /// Preset number.
    pub const PRESET: usize = 0x1B;
    /// Note latched at key-on.
    pub const KEY_ON_NOTE: usize = 0x1C;
    /// Key-on pending flag.
    pub const KEY_ON_FLAG: usize = 0x1D;
    /// Register number driving the volume, if any.
    pub const VOLUME_REG: usize = 0x1E;
    /// Cutoff mode.
    pub const CUTOFF_MODE: usize = 0x1F;
}

const fn byte(name: &'static str, offset: usize) -> Option<FieldDescriptor> {
    Some(FieldDescriptor {
        name,
        encoding: FieldEncoding::Byte(offset),
    })
}

const fn word_be(name: &'static str, offset: usize) -> Option<FieldDescriptor> {
    Some(FieldDescriptor {
        name,
        encoding: FieldEncoding::WordBe(offset, offset + 1),
    })
}

const fn word_le(name: &'static str, offset: usize) -> Option<FieldDescriptor> {
    Some(FieldDescriptor {
        name,
        encoding: FieldEncoding::WordLe(offset, offset + 1),
    })
}

const fn upper(name: &'static str, offset: usize) -> Option<FieldDescriptor> {
    Some(FieldDescriptor {
        name,
        encoding: FieldEncoding::UpperByte(offset + 1),
    })
}

const fn lower(name: &'static str, offset: usize) -> Option<FieldDescriptor> {
    Some(FieldDescriptor {
        name,
        encoding: FieldEncoding::LowerByte(offset),
    })
}

/// Track exposure table. `None` slots are word tails or internal fields;
/// offsets 0x02..=0x05 and 0x1C..=0x1F would reach sequence pointers.
static TRACK_SLOTS: [Option<FieldDescriptor>; TRACK_SLOT_COUNT] = [
    /* 0x00 */ word_be("UpdateTime", track_layout::UPDATE_TIME),
    /* 0x01 */ None,
    /* 0x02 */ None,
    /* 0x03 */ None,
    /* 0x04 */ None,
    /* 0x05 */ None,
    /* 0x06 */ lower("TrackVolume", track_layout::TRACK_VOLUME),
    /* 0x07 */ byte("BaseTempo", track_layout::BASE_TEMPO),
    /* 0x08 */ byte("TempoFraction", track_layout::TEMPO_FRACTION),
    /* 0x09 */ byte("Tempo", track_layout::TEMPO),
    /* 0x0a */ word_be("Flags", track_layout::FLAGS),
    /* 0x0b */ None,
    /* 0x0c */ byte("TempoMulFactor", track_layout::TEMPO_MUL_FACTOR),
    /* 0x0d */ byte("TempoMode", track_layout::TEMPO_MODE),
    /* 0x0e */ None,
    /* 0x0f */ None,
    /* 0x10 */ None,
    /* 0x11 */ None,
    /* 0x12 */ None,
    /* 0x13 */ byte("KeyOnBuffer", track_layout::KEY_ON_BUFFER),
    /* 0x14 */ byte("SubStackPos", track_layout::SUB_STACK_POS),
    /* 0x15 */ byte("RepeatStackPos", track_layout::REPEAT_STACK_POS),
    /* 0x16 */ byte("LoopStackPos", track_layout::LOOP_STACK_POS),
    /* 0x17 */ byte("SkipTrack", track_layout::SKIP_TRACK),
    /* 0x18 */ word_le("Fadeout", track_layout::FADEOUT),
    /* 0x19 */ None,
    /* 0x1a */ byte("RestCount", track_layout::REST_COUNT),
    /* 0x1b */ byte("TempoReg", track_layout::TEMPO_REG),
    /* 0x1c */ None,
    /* 0x1d */ None,
    /* 0x1e */ None,
    /* 0x1f */ None,
    /* 0x20 */ word_be("GlobalVolume", track_layout::GLOBAL_VOLUME),
    /* 0x21 */ None,
];

/// Channel exposure table. Offsets 0x16..=0x19 would reach the voice and
/// source pointers. `EnvNo`/`PitchEnvNo` expose their halves at unrelated
/// slots because each half is an independent driver parameter.
static CHANNEL_SLOTS: [Option<FieldDescriptor>; CHANNEL_SLOT_COUNT] = [
    /* 0x00 */ word_be("WaveNo", channel_layout::WAVE_NO),
    /* 0x01 */ None,
    /* 0x02 */ byte("Volume", channel_layout::VOLUME),
    /* 0x03 */ byte("Pan", channel_layout::PAN),
    /* 0x04 */ byte("Detune", channel_layout::DETUNE),
    /* 0x05 */ byte("BaseNote", channel_layout::BASE_NOTE),
    /* 0x06 */ lower("EnvNo", channel_layout::ENV_NO),
    /* 0x07 */ lower("PitchEnvNo", channel_layout::PITCH_ENV_NO),
    /* 0x08 */ byte("NoteDelay", channel_layout::NOTE_DELAY),
    /* 0x09 */ byte("GateTime", channel_layout::GATE_TIME),
    /* 0x0a */ byte("SampleOffset", channel_layout::SAMPLE_OFFSET),
    /* 0x0b */ byte("Transpose", channel_layout::TRANSPOSE),
    /* 0x0c */ byte("LfoNo", channel_layout::LFO_NO),
    /* 0x0d */ byte("Portamento", channel_layout::PORTAMENTO),
    /* 0x0e */ byte("PanMode", channel_layout::PAN_MODE),
    /* 0x0f */ byte("PitchReg", channel_layout::PITCH_REG),
    /* 0x10 */ byte("PresetMap", channel_layout::PRESET_MAP),
    /* 0x11 */ byte("VoiceNo", channel_layout::VOICE_NO),
    /* 0x12 */ byte("Legato", channel_layout::LEGATO),
    /* 0x13 */ byte("Enabled", channel_layout::ENABLED),
    /* 0x14 */ byte("ChannelLink", channel_layout::CHANNEL_LINK),
    /* 0x15 */ byte("Preset", channel_layout::PRESET),
    /* 0x16 */ None,
    /* 0x17 */ None,
    /* 0x18 */ None,
    /* 0x19 */ None,
    /* 0x1a */ byte("KeyOnNote", channel_layout::KEY_ON_NOTE),
    /* 0x1b */ byte("KeyOnFlag", channel_layout::KEY_ON_FLAG),
    /* 0x1c */ byte("VolumeReg", channel_layout::VOLUME_REG),
    /* 0x1d */ byte("CutoffMode", channel_layout::CUTOFF_MODE),
    /* 0x1e */ upper("EnvNo", channel_layout::ENV_NO),
    /* 0x1f */ upper("PitchEnvNo", channel_layout::PITCH_ENV_NO),
];

static TRACK_MAP: RegisterMap = RegisterMap {
    kind: EntityKind::Track,
    slots: &TRACK_SLOTS,
};

static CHANNEL_MAP: RegisterMap = RegisterMap {
    kind: EntityKind::Channel,
    slots: &CHANNEL_SLOTS,
};

/// Ordered exposure table for one entity kind.
#[derive(Debug)]
pub struct RegisterMap {
    kind: EntityKind,
    slots: &'static [Option<FieldDescriptor>],
}

impl RegisterMap {
    /// The exposure table for `kind`.
    pub fn for_kind(kind: EntityKind) -> &'static RegisterMap {
        match kind {
            EntityKind::Track => &TRACK_MAP,
            EntityKind::Channel => &CHANNEL_MAP,
        }
    }

    /// Entity kind this map describes.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Number of register offsets in the map.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Descriptor for a register offset, or `None` if the slot is not
    /// exposed (internal field, word tail, or out of range).
    pub fn descriptor(&self, slot: usize) -> Option<&FieldDescriptor> {
        self.slots.get(slot).and_then(|d| d.as_ref())
    }

    /// Read the field at `slot` from an entity's control block bytes.
    ///
    /// Returns 0 for absent slots. Half-word encodings report only their
    /// designated byte; the sibling byte is neither read nor reported.
    pub fn read_field(&self, entity: &[u8], slot: usize) -> u16 {
        let Some(desc) = self.descriptor(slot) else {
            return 0;
        };
        let at = |offset: usize| entity.get(offset).copied().unwrap_or(0);
        match desc.encoding {
            FieldEncoding::Byte(o)
            | FieldEncoding::UpperByte(o)
            | FieldEncoding::LowerByte(o) => u16::from(at(o)),
            FieldEncoding::WordBe(hi, lo) => u16::from(at(hi)) << 8 | u16::from(at(lo)),
            FieldEncoding::WordLe(lo, hi) => u16::from(at(lo)) | u16::from(at(hi)) << 8,
        }
    }

    /// Write `value` to the field at `slot` of an entity's control block.
    ///
    /// Only the bytes named by the encoding are modified; half-word writes
    /// leave the sibling byte untouched. Values wider than the encoding are
    /// truncated. Writes to absent slots are discarded.
    pub fn write_field(&self, entity: &mut [u8], slot: usize, value: u16) {
        let Some(desc) = self.descriptor(slot) else {
            return;
        };
        let mut put = |offset: usize, byte: u8| {
            if let Some(b) = entity.get_mut(offset) {
                *b = byte;
            }
        };
        match desc.encoding {
            FieldEncoding::Byte(o)
            | FieldEncoding::UpperByte(o)
            | FieldEncoding::LowerByte(o) => put(o, value as u8),
            FieldEncoding::WordBe(hi, lo) => {
                put(hi, (value >> 8) as u8);
                put(lo, value as u8);
            }
            FieldEncoding::WordLe(lo, hi) => {
                put(lo, value as u8);
                put(hi, (value >> 8) as u8);
            }
        }
    }

    /// Check that every descriptor stays within `entity_size` bytes.
    pub fn validate(&self, entity_size: usize) -> Result<(), MapError> {
        for (slot, desc) in self.slots.iter().enumerate() {
            let Some(desc) = desc else { continue };
            let (first, second) = desc.encoding.offsets();
            for offset in [Some(first), second].into_iter().flatten() {
                if offset >= entity_size {
                    return Err(MapError::OffsetOutOfBounds {
                        slot,
                        name: desc.name,
                        offset,
                        size: entity_size,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_validate_against_block_sizes() {
        for kind in [EntityKind::Track, EntityKind::Channel] {
            let map = RegisterMap::for_kind(kind);
            assert_eq!(map.kind(), kind);
            map.validate(kind.block_size()).unwrap();
        }
    }

    #[test]
    fn test_slot_counts() {
        assert_eq!(RegisterMap::for_kind(EntityKind::Track).slot_count(), 0x22);
        assert_eq!(
            RegisterMap::for_kind(EntityKind::Channel).slot_count(),
            0x20
        );
    }

    #[test]
    fn test_validate_rejects_small_entity() {
        let err = RegisterMap::for_kind(EntityKind::Track)
            .validate(0x06)
            .unwrap_err();
        assert!(matches!(err, MapError::OffsetOutOfBounds { slot: 0x06, .. }));
    }

    #[test]
    fn test_byte_round_trip() {
        let map = RegisterMap::for_kind(EntityKind::Channel);
        let mut block = [0u8; CHANNEL_BLOCK_SIZE];
        map.write_field(&mut block, 0x03, 0x5A); // Pan
        assert_eq!(map.read_field(&block, 0x03), 0x5A);
        assert_eq!(block[channel_layout::PAN], 0x5A);
    }

    #[test]
    fn test_byte_write_truncates_to_eight_bits() {
        let map = RegisterMap::for_kind(EntityKind::Channel);
        let mut block = [0u8; CHANNEL_BLOCK_SIZE];
        map.write_field(&mut block, 0x02, 0x1234); // Volume
        assert_eq!(map.read_field(&block, 0x02), 0x34);
    }

    #[test]
    fn test_word_be_byte_placement() {
        let map = RegisterMap::for_kind(EntityKind::Channel);
        let mut block = [0u8; CHANNEL_BLOCK_SIZE];
        map.write_field(&mut block, 0x00, 0xABCD); // WaveNo
        assert_eq!(block[channel_layout::WAVE_NO], 0xAB);
        assert_eq!(block[channel_layout::WAVE_NO + 1], 0xCD);
        assert_eq!(map.read_field(&block, 0x00), 0xABCD);
    }

    #[test]
    fn test_word_le_byte_placement() {
        let map = RegisterMap::for_kind(EntityKind::Track);
        let mut block = [0u8; TRACK_BLOCK_SIZE];
        map.write_field(&mut block, 0x18, 0xABCD); // Fadeout
        assert_eq!(block[track_layout::FADEOUT], 0xCD);
        assert_eq!(block[track_layout::FADEOUT + 1], 0xAB);
        assert_eq!(map.read_field(&block, 0x18), 0xABCD);
    }

    #[test]
    fn test_half_word_independence() {
        let map = RegisterMap::for_kind(EntityKind::Channel);
        let mut block = [0u8; CHANNEL_BLOCK_SIZE];

        // EnvNo lower at 0x06, EnvNo upper at 0x1e.
        map.write_field(&mut block, 0x06, 0x42);
        map.write_field(&mut block, 0x1E, 0x99);
        assert_eq!(map.read_field(&block, 0x06), 0x42);
        assert_eq!(map.read_field(&block, 0x1E), 0x99);

        // Rewriting one half must not disturb the other.
        map.write_field(&mut block, 0x1E, 0x07);
        assert_eq!(map.read_field(&block, 0x06), 0x42);
        map.write_field(&mut block, 0x06, 0xFF);
        assert_eq!(map.read_field(&block, 0x1E), 0x07);
    }

    #[test]
    fn test_absent_slot_is_inert() {
        let map = RegisterMap::for_kind(EntityKind::Track);
        let mut block = [0u8; TRACK_BLOCK_SIZE];

        // Slot 0x02 is a dummied-out pointer slot.
        assert!(map.descriptor(0x02).is_none());
        map.write_field(&mut block, 0x02, 0xFFFF);
        assert_eq!(map.read_field(&block, 0x02), 0);
        assert_eq!(block, [0u8; TRACK_BLOCK_SIZE]);
    }

    #[test]
    fn test_out_of_range_slot_is_inert() {
        let map = RegisterMap::for_kind(EntityKind::Channel);
        let mut block = [0u8; CHANNEL_BLOCK_SIZE];
        map.write_field(&mut block, 0x80, 0xFFFF);
        assert_eq!(map.read_field(&block, 0x80), 0);
        assert_eq!(block, [0u8; CHANNEL_BLOCK_SIZE]);
    }

    #[test]
    fn test_exposed_round_trip_all_slots() {
        for kind in [EntityKind::Track, EntityKind::Channel] {
            let map = RegisterMap::for_kind(kind);
            for slot in 0..map.slot_count() {
                let Some(desc) = map.descriptor(slot) else {
                    continue;
                };
                let mut block = vec![0u8; kind.block_size()];
                let mask = if desc.encoding.bits() == 16 {
                    0xFFFF
                } else {
                    0x00FF
                };
                for value in [0u16, 0x0001, 0x00FF, 0x1234, 0xFFFF] {
                    map.write_field(&mut block, slot, value);
                    assert_eq!(
                        map.read_field(&block, slot),
                        value & mask,
                        "{kind:?} slot 0x{slot:02x} ({})",
                        desc.name
                    );
                }
            }
        }
    }
}
