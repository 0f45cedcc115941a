//! Quattro sound driver state inspector
//!
//! Introspection core for an emulation of the Namco Quattro music-sequencer
//! driver (the C74/C75/C76 MCU family). It exposes the driver's live state
//! as a flat, addressable register file and resolves driver parameter codes
//! through bit-exact copies of the firmware's ROM tables, including their
//! out-of-bounds quirks.
//!
//! # Components
//! - [`tables`]: the five parameter tables (envelope rate, pitch, LFO wave,
//!   pan, volume) with their authoritative out-of-bounds tails
//! - [`regmap`]: declarative field maps over the opaque track/channel
//!   control blocks, with pointer-valued fields deliberately unexposed
//! - [`regspace`]: the flat index space (song requests, registers, voice
//!   summaries) the operator browses
//! - [`session`]: the browse/edit cursor state machine frontends drive
//! - [`driver`]: the capability trait the host emulator implements, plus a
//!   ready-made in-memory state block
//!
//! The core is synchronous and single-threaded: it runs between driver
//! ticks, borrows the driver state for one rendezvous at a time and never
//! blocks. There are no recoverable runtime errors; out-of-range values
//! clamp and writes to unexposed state are dropped.
//!
//! # Quick start
//! ```
//! use quattro::{DriverState, InspectorSession, ParamTable, RegisterSpace};
//!
//! let mut driver = DriverState::new(0x40);
//! let mut space = RegisterSpace::new(&mut driver);
//! let mut session = InspectorSession::new();
//!
//! // Start song 0x21 on slot 0 through an edit.
//! session.begin_edit(&mut space);
//! session.adjust(&space, 0x21);
//! session.commit(&mut space);
//! assert_eq!(space.get(0), 0x21);
//!
//! // Resolve a driver parameter the way the hardware would.
//! assert_eq!(ParamTable::EnvelopeRate.resolve(0x7F), 0xFFFF);
//! ```

#![warn(missing_docs)]

pub mod driver;
pub mod regmap;
pub mod regspace;
pub mod session;
pub mod tables;

pub use driver::{Driver, DriverState, SongStatus, VoiceRecord, SONG_NUMBER_MASK};
pub use regmap::{EntityKind, FieldDescriptor, FieldEncoding, MapError, RegisterMap};
pub use regspace::{RegisterSpace, Zone, REGISTER_SPACE_SIZE};
pub use session::{EditMode, InspectorSession};
pub use tables::ParamTable;
