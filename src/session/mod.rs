//! Session records and their in-memory store
//!
//! A `Session` tracks one capture from recording start through upload and
//! analysis. Records live only in process memory (volatile by design) and are
//! never removed during the process's lifetime.

mod model;
mod repository;

pub use model::{Session, SessionPatch, SessionStatus};
pub use repository::SessionRepository;
