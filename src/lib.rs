#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bitboard;
mod common;
mod config;
mod fleet;
mod game;
mod grid;
mod ship;
mod targeting;
mod view;
#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
mod scheduler;

pub use bitboard::{BitBoard, BitBoardError, GridMask};
pub use common::*;
pub use config::*;
pub use fleet::*;
pub use game::*;
pub use grid::{Cell, Grid};
pub use ship::*;
pub use targeting::*;
pub use view::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, LogFilter};
#[cfg(feature = "std")]
pub use scheduler::OpponentClock;
