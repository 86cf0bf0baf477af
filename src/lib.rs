pub mod analysis;
pub mod config;
pub mod encoder;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod session;
pub mod storage;

pub use analysis::{AnalysisDispatcher, HttpAnalysisDispatcher};
pub use config::Config;
pub use encoder::EncoderSupervisor;
pub use error::SessionError;
pub use http::{create_router, AppState};
pub use orchestrator::SessionOrchestrator;
pub use session::{Session, SessionPatch, SessionRepository, SessionStatus};
pub use storage::{ObjectStorePublisher, S3Publisher};
