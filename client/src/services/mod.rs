//! Dashboard services built on the external clients

pub mod enrichment;
pub mod orchestrator;
pub mod session_guard;

pub use enrichment::ContextProvider;
pub use orchestrator::PredictionOrchestrator;
pub use session_guard::{SessionGuard, VerifiedSession};
