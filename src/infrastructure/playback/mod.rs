//! Audio playback adapters

mod rodio;

pub use self::rodio::RodioPlayer;
