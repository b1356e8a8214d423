//! View-controller for a remotely driven minesweeper board.
//!
//! The engine owns every game rule. This crate mirrors the snapshots it
//! publishes, paints them onto a [`Surface`] and turns pointer input into
//! [`RemoteCommand`]s.

pub use controller::*;
pub use error::*;
pub use input::*;
pub use metrics::*;
pub use remote::*;
pub use render::*;
pub use snapshot::*;
pub use store::*;
pub use subscription::*;
pub use surface::*;
pub use types::*;

pub use sweepview_protocol::{Cell, CellSlot, Difficulty, GameProgress, WireBoard};

mod controller;
mod error;
mod input;
mod metrics;
mod remote;
mod render;
mod snapshot;
mod store;
mod subscription;
mod surface;
mod types;

#[cfg(test)]
pub(crate) mod testing;
