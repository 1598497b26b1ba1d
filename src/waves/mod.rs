//! Wave and spawn-group scheduling.
//!
//! # Wave flow
//!
//! ```text
//! level-start delay → group spawn_delay → spawn ─┐
//!        ▲                                       │ spawn_interval
//!        │                                       ▼
//!   (next stage)                        group exhausted → next group
//!                                                │
//!                                                ▼
//!                       all groups exhausted + no live wave enemies
//!                                                │
//!                                                ▼
//!                               on-clear: next wave or boss trigger
//! ```
//!
//! The scheduler itself is a plain resource ([`WaveManager`]); the stage flow
//! system ticks it and the spawner drains it, so ordering stays explicit.

pub mod state;
pub mod tracking;

pub use state::WaveManager;
pub use tracking::WaveEnemy;
