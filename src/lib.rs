//! Voice Auditor - sort audio files by voice
//!
//! Scans an input directory for audio files and plays them one at a time.
//! While a file plays, a spoken (or typed) command decides its fate:
//! `accept` moves it into the output directory at the same relative path,
//! `delete` removes it, `skip` leaves it in place.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Commands, work queue, session state, path arithmetic, config
//! - **Application**: The audit loop, dispatcher and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (rodio, cpal, whisper-rs, walkdir)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
