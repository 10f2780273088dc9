//! Audio file discovery adapters

mod walkdir;

pub use self::walkdir::WalkdirScanner;
