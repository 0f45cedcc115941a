//! End-to-end inspector flows over an in-memory driver state.

use quattro::{
    driver::{Driver, DriverState},
    regspace::{RegisterSpace, Zone, REGISTER_BASE, REGISTER_SPACE_SIZE, VOICE_BASE},
    session::{EditMode, InspectorSession},
    SongStatus,
};

#[test]
fn zone_partition_covers_every_index_exactly_once() {
    let mut song = 0;
    let mut reg = 0;
    let mut voice = 0;
    for index in 0..REGISTER_SPACE_SIZE {
        match Zone::of(index) {
            Zone::SongRequest => song += 1,
            Zone::Register => reg += 1,
            Zone::VoiceSummary => voice += 1,
            Zone::Invalid => panic!("index 0x{index:03x} classified invalid"),
        }
    }
    assert_eq!((song, reg, voice), (0x20, 0x100, 0x20));
    for index in [REGISTER_SPACE_SIZE, REGISTER_SPACE_SIZE + 1, 0x1000] {
        assert_eq!(Zone::of(index), Zone::Invalid);
    }
}

#[test]
fn browse_edit_commit_register_flow() {
    let mut drv = DriverState::new(0x40);
    let mut space = RegisterSpace::new(&mut drv);
    let mut session = InspectorSession::new();

    // Walk to generic register 0x04 (one row down, four cells right).
    session.select(8);
    session.select(8);
    session.select(8);
    session.select(8);
    session.select(4);
    assert_eq!(session.selected(), REGISTER_BASE + 4);
    assert_eq!(session.selected_zone(), Zone::Register);

    session.begin_edit(&mut space);
    session.adjust(&space, 0x30);
    session.commit(&mut space);

    assert_eq!(space.get(REGISTER_BASE + 4), 0x30);
    assert_eq!(session.mode(), EditMode::Browsing);
}

#[test]
fn wrap_around_at_both_ends_of_the_space() {
    let mut session = InspectorSession::new();
    session.select(-1);
    assert_eq!(session.selected(), REGISTER_SPACE_SIZE - 1);
    session.select(1);
    assert_eq!(session.selected(), 0);
}

#[test]
fn song_request_edit_clamps_and_starts() {
    let mut drv = DriverState::new(0x21);
    let mut space = RegisterSpace::new(&mut drv);
    let mut session = InspectorSession::new();

    session.begin_edit(&mut space);
    session.adjust(&space, 0x100); // way past the last song
    assert_eq!(session.staged(), 0x20);
    session.commit(&mut space);

    let word = space.song_request_word(0);
    assert_eq!(word & 0x07FF, 0x20);
    assert!(SongStatus::from_word(word).contains(SongStatus::START));
}

#[test]
fn song_request_round_trip_at_ceiling() {
    let mut drv = DriverState::new(0x10);
    let mut space = RegisterSpace::new(&mut drv);

    // Writing songCount directly is allowed (set is raw)...
    space.set(3, 0x10);
    assert_eq!(space.get(3), 0x10);

    // ...but the session clamps it to songCount - 1.
    let mut session = InspectorSession::new();
    session.select(3);
    session.begin_edit(&mut space);
    session.adjust(&space, 1);
    assert_eq!(session.staged(), 0x0F);
}

#[test]
fn edits_on_song_slots_reset_loop_detection() {
    let mut drv = DriverState::new(0x40);
    drv.note_loop(0);
    drv.note_loop(0);

    {
        let mut space = RegisterSpace::new(&mut drv);
        let mut session = InspectorSession::new();
        session.begin_edit(&mut space);
    }
    assert_eq!(drv.loop_count(0), 0);

    drv.note_loop(7);
    {
        let mut space = RegisterSpace::new(&mut drv);
        space.fade_song(7);
    }
    assert_eq!(drv.loop_count(7), 0);
    assert!(SongStatus::from_word(drv.song_request(7)).contains(SongStatus::FADE));

    drv.note_loop(7);
    {
        let mut space = RegisterSpace::new(&mut drv);
        space.stop_song(7);
    }
    assert_eq!(drv.loop_count(7), 0);
}

#[test]
fn register_edits_leave_loop_detection_alone() {
    let mut drv = DriverState::new(0x40);
    drv.note_loop(0);
    {
        let mut space = RegisterSpace::new(&mut drv);
        let mut session = InspectorSession::new();
        session.select(REGISTER_BASE as i32);
        session.begin_edit(&mut space);
        session.adjust(&space, 2);
        session.commit(&mut space);
    }
    assert_eq!(drv.loop_count(0), 1);
}

#[test]
fn voice_summary_reflects_live_bindings() {
    let mut drv = DriverState::new(8);
    drv.bind_voice(0x11, 4, 2, true); // track index 3, stored 1-based

    let space = RegisterSpace::new(&mut drv);
    let word = space.get(VOICE_BASE + 0x11);
    assert_eq!(word & 0x8000, 0x8000, "bound bit");
    assert_eq!(word >> 8 & 0x7F, 3, "track index");
    assert_eq!(word & 0x80, 0x80, "enabled bit");
    assert_eq!(word & 0x7F, 2, "channel index");

    // Rebinding shows up on the next read; nothing is cached.
    drv.bind_voice(0x11, 0, 0, false);
    let space = RegisterSpace::new(&mut drv);
    assert_eq!(space.get(VOICE_BASE + 0x11), 0);
}

#[test]
fn solo_and_mute_survive_summary_reads() {
    let mut drv = DriverState::new(8);
    {
        let mut space = RegisterSpace::new(&mut drv);
        let mut session = InspectorSession::new();
        session.select(VOICE_BASE as i32 + 3);

        // Voice rows don't take value edits; solo/mute is the mutation path.
        session.begin_edit(&mut space);
        assert_eq!(session.mode(), EditMode::Browsing);
        space.toggle_solo(3);
        space.toggle_mute(5);

        // Reading summaries does not disturb the masks.
        for voice in 0..0x20 {
            let _ = space.get(VOICE_BASE + voice);
        }
        assert_eq!(space.solo_mask(), 1 << 3);
        assert_eq!(space.mute_mask(), 1 << 5);
    }
    assert!(!drv.voice_muted(3));
    assert!(drv.voice_muted(4), "solo silences everything else");

    let mut space = RegisterSpace::new(&mut drv);
    space.clear_voice_masks();
    assert_eq!(space.solo_mask(), 0);
    assert_eq!(space.mute_mask(), 0);
}

#[test]
fn nudge_and_clear_shorthand_paths() {
    let mut drv = DriverState::new(0x40);
    let mut space = RegisterSpace::new(&mut drv);
    let mut session = InspectorSession::new();

    // Nudge on a song slot starts the song with the stepped number.
    session.nudge(&mut space, 1);
    assert_eq!(space.song_request_word(0), 0x4001);

    // Nudge below zero clamps to zero (still a start).
    session.nudge(&mut space, -5);
    assert_eq!(space.song_request_word(0), 0x4000);

    // Clear writes the song number without the start flag.
    session.clear(&mut space);
    assert_eq!(space.song_request_word(0), 0x0000);

    // Register nudges are plain writes.
    session.select(REGISTER_BASE as i32 + 1);
    session.nudge(&mut space, 3);
    session.nudge(&mut space, 3);
    assert_eq!(space.get(REGISTER_BASE + 1), 6);
}

#[test]
fn attenuate_toggle_preserves_song_number() {
    let mut drv = DriverState::new(0x40);
    let mut space = RegisterSpace::new(&mut drv);
    space.set(2, 0x8031);

    space.toggle_attenuate(2);
    assert_eq!(space.song_request_word(2), 0x9031);
    assert_eq!(space.get(2), 0x31, "display value unchanged");
    space.toggle_attenuate(2);
    assert_eq!(space.song_request_word(2), 0x8031);
}
