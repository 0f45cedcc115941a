//! Flat register index space over the live driver state.
//!
//! Presents song-request slots, generic registers and per-voice summaries as
//! one contiguous, zero-based index space, the same matrix the original tool
//! painted on screen:
//!
//! - `0x000..0x020` song-request slots
//! - `0x020..0x120` generic registers
//! - `0x120..0x140` voice summaries (derived, read-only)
//!
//! Everything outside those ranges is invalid: reads return 0, writes are
//! dropped. [`RegisterSpace`] borrows the driver mutably for the duration of
//! one rendezvous between driver ticks.

use crate::driver::{Driver, SongStatus, SONG_NUMBER_MASK};

/// First index of the song-request zone.
pub const SONG_REQUEST_BASE: usize = 0x000;

/// First index of the generic register zone.
pub const REGISTER_BASE: usize = 0x020;

/// First index of the voice summary zone.
pub const VOICE_BASE: usize = 0x120;

/// One past the last valid register index.
pub const REGISTER_SPACE_SIZE: usize = 0x140;

/// Zone a register index falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Song-request slot.
    SongRequest,
    /// Generic driver register.
    Register,
    /// Derived per-voice summary.
    VoiceSummary,
    /// Outside the addressable space.
    Invalid,
}

impl Zone {
    /// Classify a flat register index.
    pub fn of(index: usize) -> Self {
        match index {
            SONG_REQUEST_BASE..REGISTER_BASE => Zone::SongRequest,
            REGISTER_BASE..VOICE_BASE => Zone::Register,
            VOICE_BASE..REGISTER_SPACE_SIZE => Zone::VoiceSummary,
            _ => Zone::Invalid,
        }
    }

    /// Offset of `index` within its zone, or `None` for invalid indices.
    pub fn offset(index: usize) -> Option<usize> {
        match Zone::of(index) {
            Zone::SongRequest => Some(index - SONG_REQUEST_BASE),
            Zone::Register => Some(index - REGISTER_BASE),
            Zone::VoiceSummary => Some(index - VOICE_BASE),
            Zone::Invalid => None,
        }
    }
}

/// Uniform read/write view over the driver's addressable state.
#[derive(Debug)]
pub struct RegisterSpace<'a, D: Driver> {
    driver: &'a mut D,
}

impl<'a, D: Driver> RegisterSpace<'a, D> {
    /// Borrow the driver for one inspection rendezvous.
    pub fn new(driver: &'a mut D) -> Self {
        Self { driver }
    }

    /// Classify a flat register index.
    pub fn classify(&self, index: usize) -> Zone {
        Zone::of(index)
    }

    /// Read the value at a flat register index.
    ///
    /// Song-request slots report only the song-number subfield; the status
    /// bits stay in storage. Voice summaries are derived on every read.
    /// Invalid indices read as 0.
    pub fn get(&self, index: usize) -> u16 {
        match Zone::of(index) {
            Zone::SongRequest => self.driver.song_request(index) & SONG_NUMBER_MASK,
            Zone::Register => self.driver.register(index - REGISTER_BASE),
            Zone::VoiceSummary => self.voice_summary(index - VOICE_BASE),
            Zone::Invalid => 0,
        }
    }

    /// Write a value to a flat register index.
    ///
    /// Song-request slots take the full word as given; callers wanting the
    /// driver to act must set the status bits themselves (or use the command
    /// helpers below). Voice summaries are read-only composites, so writes
    /// to them, like writes to invalid indices, are dropped.
    pub fn set(&mut self, index: usize, value: u16) {
        match Zone::of(index) {
            Zone::SongRequest => self.driver.set_song_request(index, value),
            Zone::Register => self.driver.set_register(index - REGISTER_BASE, value),
            Zone::VoiceSummary | Zone::Invalid => {}
        }
    }

    /// Composite summary word for a voice.
    ///
    /// Bit 15 is set when a track is bound, bits 8..=14 then hold the
    /// zero-based track index and bits 0..=6 the channel index. Bit 7 is set
    /// while the voice is enabled. Unbound, disabled voices read as 0.
    pub fn voice_summary(&self, voice: usize) -> u16 {
        let record = self.driver.voice(voice);
        let mut word = 0;
        if record.is_bound() {
            word = 0x8000
                | u16::from(record.track - 1) << 8
                | u16::from(record.channel) & 0x7F;
        }
        if record.enabled {
            word |= 0x80;
        }
        word
    }

    /// Number of valid songs; the edit ceiling for song-request slots.
    pub fn song_count(&self) -> u16 {
        self.driver.song_count()
    }

    /// Write a start request: song number plus the `START` flag.
    ///
    /// Resets loop detection first, as every playback command must.
    pub fn start_song(&mut self, slot: usize, song: u16) {
        self.driver.reset_loop_detection();
        self.driver
            .set_song_request(slot, (song & SONG_NUMBER_MASK) | SongStatus::START.bits());
    }

    /// Write a song number without raising `START` (stage a request only).
    pub fn request_song(&mut self, slot: usize, song: u16) {
        self.driver.reset_loop_detection();
        self.driver.set_song_request(slot, song & SONG_NUMBER_MASK);
    }

    /// Begin fading out the song on a slot.
    pub fn fade_song(&mut self, slot: usize) {
        self.driver.reset_loop_detection();
        let word = self.driver.song_request(slot);
        self.driver
            .set_song_request(slot, word | SongStatus::FADE.bits());
    }

    /// Stop the song on a slot by clearing its `BUSY` bit.
    pub fn stop_song(&mut self, slot: usize) {
        self.driver.reset_loop_detection();
        let word = self.driver.song_request(slot);
        self.driver
            .set_song_request(slot, word & !SongStatus::BUSY.bits());
    }

    /// Toggle the `ATTENUATE` flag on a slot.
    pub fn toggle_attenuate(&mut self, slot: usize) {
        let word = self.driver.song_request(slot);
        self.driver
            .set_song_request(slot, word ^ SongStatus::ATTENUATE.bits());
    }

    /// Raw request word of a slot, status bits included.
    pub fn song_request_word(&self, slot: usize) -> u16 {
        self.driver.song_request(slot)
    }

    /// Toggle a voice's solo bit and recompute audibility.
    pub fn toggle_solo(&mut self, voice: usize) {
        let mask = self.driver.solo_mask() ^ 1 << (voice as u32 & 0x1F);
        self.driver.set_solo_mask(mask);
        self.driver.update_mute_state();
    }

    /// Toggle a voice's mute bit and recompute audibility.
    pub fn toggle_mute(&mut self, voice: usize) {
        let mask = self.driver.mute_mask() ^ 1 << (voice as u32 & 0x1F);
        self.driver.set_mute_mask(mask);
        self.driver.update_mute_state();
    }

    /// Clear both solo and mute masks and recompute audibility.
    pub fn clear_voice_masks(&mut self) {
        self.driver.set_solo_mask(0);
        self.driver.set_mute_mask(0);
        self.driver.update_mute_state();
    }

    /// Current solo bitmask.
    pub fn solo_mask(&self) -> u32 {
        self.driver.solo_mask()
    }

    /// Current mute bitmask.
    pub fn mute_mask(&self) -> u32 {
        self.driver.mute_mask()
    }

    /// Reset loop-detection bookkeeping (required when an edit begins on a
    /// song-request slot).
    pub fn reset_loop_detection(&mut self) {
        self.driver.reset_loop_detection();
    }
}
