//! Sync module - orchestration of full balance refreshes.

mod orchestrator;

// Re-export the public interface
pub use orchestrator::SyncOrchestrator;
