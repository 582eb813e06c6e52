pub mod group_catalog;
pub mod outcome;
pub mod query_orchestrator;
pub mod study_session;

pub use group_catalog::GroupCatalog;
pub use outcome::Outcome;
pub use query_orchestrator::{InFlightGuard, QueryOrchestrator};
pub use study_session::StudySession;
