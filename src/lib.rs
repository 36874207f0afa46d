//! Computer-opponent decision engine for a grid-combat board game.
//!
//! Two hidden fleets of five ships trade shots on a 10×10 grid. This crate
//! implements the opponent's side of the exchange: placing its fleet,
//! choosing where to fire and tracking what it has learned, across three
//! difficulty tiers. The surrounding game — turn order, win detection,
//! state sync — drives the engine through the narrow interface on
//! [`AiEngine`].

mod board;
mod config;
mod density;
mod engine;
mod grid;
mod logging;
mod placement;
mod ship;
mod targeting;

pub use board::*;
pub use config::*;
pub use density::*;
pub use engine::*;
pub use grid::*;
pub use logging::init_logging;
pub use placement::*;
pub use ship::*;
pub use targeting::{is_isolated, position_value, TargetingState};
