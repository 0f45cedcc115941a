//! Inspector session: selection cursor and staged-edit state machine.
//!
//! A session is a plain value owned by the frontend, created once per screen
//! and passed into every operation; there is no global cursor state. It is
//! either browsing (moving the selection across the register space) or
//! editing (holding a staged value for the selected index). Committing goes
//! back through [`RegisterSpace`], so the session itself never touches driver
//! arrays directly.
//!
//! Staged values saturate: the floor is always 0, the ceiling is
//! `song_count - 1` on song-request slots and 0xFFFF everywhere else.
//! Out-of-range adjustments clamp silently, matching the tool's
//! no-guardrails philosophy of accepting any representable value.

use crate::driver::Driver;
use crate::regspace::{RegisterSpace, Zone, REGISTER_SPACE_SIZE};

/// What the session is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Moving the selection cursor.
    Browsing,
    /// Holding a staged value for the selected index.
    Editing,
}

/// Selection cursor plus staged-edit state for one inspector screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorSession {
    index: usize,
    mode: EditMode,
    staged: u16,
}

impl InspectorSession {
    /// New session: index 0, browsing.
    pub fn new() -> Self {
        Self {
            index: 0,
            mode: EditMode::Browsing,
            staged: 0,
        }
    }

    /// Currently selected register index.
    pub fn selected(&self) -> usize {
        self.index
    }

    /// Zone of the currently selected index.
    pub fn selected_zone(&self) -> Zone {
        Zone::of(self.index)
    }

    /// Current mode.
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Staged value (meaningful while editing).
    pub fn staged(&self) -> u16 {
        self.staged
    }

    /// Move the selection by `delta` (±1 for a cell, ±row width for a row),
    /// wrapping across the full index range in both directions. Ignored
    /// while editing.
    pub fn select(&mut self, delta: i32) {
        if self.mode != EditMode::Browsing {
            return;
        }
        let span = REGISTER_SPACE_SIZE as i64;
        self.index = (self.index as i64 + i64::from(delta)).rem_euclid(span) as usize;
    }

    /// Enter edit mode on the selected index, staging its current value.
    ///
    /// Song-request slots stage only the song-number subfield (the zone's
    /// `get` already strips the status bits) and reset loop detection, since
    /// the edit will end in a playback command. Voice summaries and invalid
    /// indices are not editable; the session stays browsing.
    pub fn begin_edit<D: Driver>(&mut self, space: &mut RegisterSpace<'_, D>) {
        if self.mode != EditMode::Browsing {
            return;
        }
        match Zone::of(self.index) {
            Zone::SongRequest => {
                space.reset_loop_detection();
            }
            Zone::Register => {}
            Zone::VoiceSummary | Zone::Invalid => return,
        }
        self.staged = space.get(self.index);
        self.mode = EditMode::Editing;
    }

    /// Adjust the staged value by `delta`, clamping. Ignored while browsing.
    pub fn adjust<D: Driver>(&mut self, space: &RegisterSpace<'_, D>, delta: i32) {
        if self.mode != EditMode::Editing {
            return;
        }
        self.staged = self.clamp(space, i64::from(self.staged) + i64::from(delta));
    }

    /// Commit the staged value and return to browsing.
    ///
    /// A commit on a song-request slot is a start request (the driver picks
    /// the song up on its next tick); registers are written as-is.
    pub fn commit<D: Driver>(&mut self, space: &mut RegisterSpace<'_, D>) {
        if self.mode != EditMode::Editing {
            return;
        }
        self.write_selected(space, self.staged, true);
        self.mode = EditMode::Browsing;
    }

    /// Abandon the staged value and return to browsing.
    pub fn cancel(&mut self) {
        self.mode = EditMode::Browsing;
    }

    /// Browsing shorthand: read, add `delta`, clamp and commit in one step,
    /// without entering edit mode.
    pub fn nudge<D: Driver>(&mut self, space: &mut RegisterSpace<'_, D>, delta: i32) {
        if self.mode != EditMode::Browsing || !self.editable() {
            return;
        }
        let value = self.clamp(space, i64::from(space.get(self.index)) + i64::from(delta));
        self.write_selected(space, value, true);
    }

    /// Browsing shorthand: write 0 to the selected index. On a song-request
    /// slot this stages song 0 without raising the start flag.
    pub fn clear<D: Driver>(&mut self, space: &mut RegisterSpace<'_, D>) {
        if self.mode != EditMode::Browsing || !self.editable() {
            return;
        }
        self.write_selected(space, 0, false);
    }

    /// Re-issue a start request for the selected song slot with its current
    /// song number. No-op elsewhere.
    pub fn restart<D: Driver>(&mut self, space: &mut RegisterSpace<'_, D>) {
        if self.mode != EditMode::Browsing || Zone::of(self.index) != Zone::SongRequest {
            return;
        }
        let song = space.get(self.index);
        space.start_song(self.index, song);
    }

    /// Whether the selected index accepts value edits.
    pub fn editable(&self) -> bool {
        matches!(Zone::of(self.index), Zone::SongRequest | Zone::Register)
    }

    fn write_selected<D: Driver>(
        &self,
        space: &mut RegisterSpace<'_, D>,
        value: u16,
        start: bool,
    ) {
        match Zone::of(self.index) {
            Zone::SongRequest => {
                if start {
                    space.start_song(self.index, value);
                } else {
                    space.request_song(self.index, value);
                }
            }
            Zone::Register => space.set(self.index, value),
            Zone::VoiceSummary | Zone::Invalid => {}
        }
    }

    fn clamp<D: Driver>(&self, space: &RegisterSpace<'_, D>, value: i64) -> u16 {
        let ceiling = match Zone::of(self.index) {
            Zone::SongRequest => i64::from(space.song_count()).saturating_sub(1).max(0),
            _ => 0xFFFF,
        };
        value.clamp(0, ceiling) as u16
    }
}

impl Default for InspectorSession {
    fn default() -> Self {
        Self::new()
    }
}
