//! Driver seam: the live sequencer state the inspector reads and writes.
//!
//! The sound driver owns its state arrays (song requests, generic registers,
//! voice assignments, mute bookkeeping); the inspector only borrows them at a
//! safe rendezvous point between driver ticks. [`Driver`] is the capability
//! trait that seam is expressed through, and [`DriverState`] is the plain
//! in-memory implementation a host emulator embeds.
//!
//! Everything here is single-threaded and synchronous: the caller guarantees
//! the driver is not mid-update while the inspector holds the borrow, so no
//! locking is involved.

use crate::regmap::{CHANNEL_BLOCK_SIZE, TRACK_BLOCK_SIZE};
use bitflags::bitflags;

/// Number of song-request slots.
pub const SONG_SLOT_COUNT: usize = 0x20;

/// Number of generic driver registers.
pub const REGISTER_COUNT: usize = 0x100;

/// Number of hardware voices.
pub const VOICE_COUNT: usize = 0x20;

/// Number of track control blocks.
pub const TRACK_COUNT: usize = 0x20;

/// Number of channel control blocks.
pub const CHANNEL_COUNT: usize = 0x20;

/// Song number subfield of a request word (low 11 bits).
pub const SONG_NUMBER_MASK: u16 = 0x07FF;

bitflags! {
    /// Status bits co-resident with the song number in a request word.
    ///
    /// The driver polls these every tick: `START` asks it to begin playing
    /// the requested song, `BUSY` is held while the song runs, `FADE`
    /// triggers a fadeout and `ATTENUATE` ducks the song under another.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SongStatus: u16 {
        /// Song is playing (cleared to stop it).
        const BUSY = 0x8000;
        /// Start request pending.
        const START = 0x4000;
        /// Fadeout in progress.
        const FADE = 0x2000;
        /// Song volume is attenuated.
        const ATTENUATE = 0x1000;
    }
}

impl SongStatus {
    /// Status bits of a raw request word (song number stripped).
    pub fn from_word(word: u16) -> Self {
        SongStatus::from_bits_truncate(word)
    }
}

/// Binding state of one hardware voice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoiceRecord {
    /// Bound track, 1-based; 0 means the voice is unbound.
    pub track: u8,
    /// Bound channel index.
    pub channel: u8,
    /// Whether the voice is currently producing output.
    pub enabled: bool,
}

impl VoiceRecord {
    /// Whether a track is bound to this voice.
    pub fn is_bound(&self) -> bool {
        self.track != 0
    }
}

/// Capabilities the inspector requires from the live driver.
///
/// Implemented by [`DriverState`]; a host emulator with its own state layout
/// can implement it directly instead.
pub trait Driver {
    /// Current word of a song-request slot.
    fn song_request(&self, slot: usize) -> u16;

    /// Overwrite a song-request slot with a full word (flags included).
    fn set_song_request(&mut self, slot: usize, word: u16);

    /// Current value of a generic register.
    fn register(&self, slot: usize) -> u16;

    /// Overwrite a generic register.
    fn set_register(&mut self, slot: usize, word: u16);

    /// Binding record of a voice.
    fn voice(&self, voice: usize) -> VoiceRecord;

    /// Solo bitmask, one bit per voice.
    fn solo_mask(&self) -> u32;

    /// Replace the solo bitmask.
    fn set_solo_mask(&mut self, mask: u32);

    /// Mute bitmask, one bit per voice.
    fn mute_mask(&self) -> u32;

    /// Replace the mute bitmask.
    fn set_mute_mask(&mut self, mask: u32);

    /// Number of valid songs in the loaded sound data.
    fn song_count(&self) -> u16;

    /// Discard any loop-detection bookkeeping.
    ///
    /// Must be invoked whenever a start/fade/stop command is issued or a
    /// song-request edit begins, so stale loop counts never outlive the
    /// request that produced them.
    fn reset_loop_detection(&mut self);

    /// Recompute effective per-voice audibility after a mask change.
    fn update_mute_state(&mut self);

    /// Raw control block of a track.
    fn track_bytes(&self, track: usize) -> &[u8];

    /// Mutable control block of a track.
    fn track_bytes_mut(&mut self, track: usize) -> &mut [u8];

    /// Raw control block of a channel.
    fn channel_bytes(&self, channel: usize) -> &[u8];

    /// Mutable control block of a channel.
    fn channel_bytes_mut(&mut self, channel: usize) -> &mut [u8];
}

/// In-memory driver state block.
///
/// Holds every array the inspector touches, sized to the driver's fixed
/// limits. Slot and voice indices are masked to their array sizes, the same
/// wrap-on-overflow the MCU's address decoding produced.
#[derive(Debug, Clone)]
pub struct DriverState {
    song_requests: [u16; SONG_SLOT_COUNT],
    registers: [u16; REGISTER_COUNT],
    voices: [VoiceRecord; VOICE_COUNT],
    tracks: [[u8; TRACK_BLOCK_SIZE]; TRACK_COUNT],
    channels: [[u8; CHANNEL_BLOCK_SIZE]; CHANNEL_COUNT],
    solo_mask: u32,
    mute_mask: u32,
    voice_mute: u32,
    song_count: u16,
    loop_counts: [u8; SONG_SLOT_COUNT],
}

impl DriverState {
    /// Create a zeroed driver state for sound data with `song_count` songs.
    pub fn new(song_count: u16) -> Self {
        Self {
            song_requests: [0; SONG_SLOT_COUNT],
            registers: [0; REGISTER_COUNT],
            voices: [VoiceRecord::default(); VOICE_COUNT],
            tracks: [[0; TRACK_BLOCK_SIZE]; TRACK_COUNT],
            channels: [[0; CHANNEL_BLOCK_SIZE]; CHANNEL_COUNT],
            solo_mask: 0,
            mute_mask: 0,
            voice_mute: 0,
            song_count,
            loop_counts: [0; SONG_SLOT_COUNT],
        }
    }

    /// Bind a voice to a (track, channel) pair. `track` is 1-based.
    pub fn bind_voice(&mut self, voice: usize, track: u8, channel: u8, enabled: bool) {
        self.voices[voice % VOICE_COUNT] = VoiceRecord {
            track,
            channel,
            enabled,
        };
    }

    /// Effective mute mask after solo/mute resolution.
    pub fn effective_mute(&self) -> u32 {
        self.voice_mute
    }

    /// Whether a voice is currently silenced by solo/mute state.
    pub fn voice_muted(&self, voice: usize) -> bool {
        self.voice_mute & 1 << (voice % VOICE_COUNT) != 0
    }

    /// Record one detected loop on a song slot (called by the driver's
    /// sequence interpreter when playback passes a loop point).
    pub fn note_loop(&mut self, slot: usize) {
        let count = &mut self.loop_counts[slot % SONG_SLOT_COUNT];
        *count = count.saturating_add(1);
    }

    /// Detected loop count for a song slot.
    pub fn loop_count(&self, slot: usize) -> u8 {
        self.loop_counts[slot % SONG_SLOT_COUNT]
    }
}

impl Driver for DriverState {
    fn song_request(&self, slot: usize) -> u16 {
        self.song_requests[slot % SONG_SLOT_COUNT]
    }

    fn set_song_request(&mut self, slot: usize, word: u16) {
        self.song_requests[slot % SONG_SLOT_COUNT] = word;
    }

    fn register(&self, slot: usize) -> u16 {
        self.registers[slot % REGISTER_COUNT]
    }

    fn set_register(&mut self, slot: usize, word: u16) {
        self.registers[slot % REGISTER_COUNT] = word;
    }

    fn voice(&self, voice: usize) -> VoiceRecord {
        self.voices[voice % VOICE_COUNT]
    }

    fn solo_mask(&self) -> u32 {
        self.solo_mask
    }

    fn set_solo_mask(&mut self, mask: u32) {
        self.solo_mask = mask;
    }

    fn mute_mask(&self) -> u32 {
        self.mute_mask
    }

    fn set_mute_mask(&mut self, mask: u32) {
        self.mute_mask = mask;
    }

    fn song_count(&self) -> u16 {
        self.song_count
    }

    fn reset_loop_detection(&mut self) {
        self.loop_counts = [0; SONG_SLOT_COUNT];
    }

    fn update_mute_state(&mut self) {
        // Solo wins: while any solo bit is set, everything not soloed is
        // silenced and the mute mask is ignored.
        self.voice_mute = if self.solo_mask != 0 {
            !self.solo_mask
        } else {
            self.mute_mask
        };
    }

    fn track_bytes(&self, track: usize) -> &[u8] {
        &self.tracks[track % TRACK_COUNT]
    }

    fn track_bytes_mut(&mut self, track: usize) -> &mut [u8] {
        &mut self.tracks[track % TRACK_COUNT]
    }

    fn channel_bytes(&self, channel: usize) -> &[u8] {
        &self.channels[channel % CHANNEL_COUNT]
    }

    fn channel_bytes_mut(&mut self, channel: usize) -> &mut [u8] {
        &mut self.channels[channel % CHANNEL_COUNT]
    }
}
