//! Stat system.
//!
//! ```text
//! [ BaseStats ] + [ StatModifier (equipment, passives) ] + [ Buff ]
//!                          ↓
//!                    [ BonusStack ]
//!                          ↓
//!                   [ CurrentStats ]
//! ```
//!
//! ## Principles
//!
//! 1. **SSOT**: base stats and the two current pools only
//! 2. **Derived, never patched**: current stats are rebuilt on every modifier change
//! 3. **Deterministic**: pure functions, no I/O or randomness
//!
//! ## Bonus Stack
//!
//! Every derived stat uses the same calculation order:
//! `Flat → %Inc → More → Less → Clamp`

pub mod base;
pub mod bonus;
pub mod ingest;
pub mod resources;

pub use base::{BaseStats, CurrentStats, StatKind, StatModifier};
pub use bonus::{Bonus, BonusStack, StatBounds};
pub use ingest::{IngestIssue, IngestWarning, RawStatBlock, RawValue};
pub use resources::ResourceKind;
