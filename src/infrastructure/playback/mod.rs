//! Playback infrastructure module
//!
//! Plays recordings and the guide track through rodio.

mod rodio_player;

pub use rodio_player::RodioPlayer;
