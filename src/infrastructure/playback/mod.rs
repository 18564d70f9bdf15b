//! Playback adapters

mod noop;
mod rodio_player;

pub use noop::NoOpPlayer;
pub use rodio_player::RodioPlayer;
