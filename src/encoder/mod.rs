//! External encoder process supervision
//!
//! One ffmpeg process per active session: spawned when recording starts,
//! asked to finish gracefully when it stops, exit status observed by a
//! watcher task decoupled from request handling.

mod supervisor;

pub use supervisor::EncoderSupervisor;
