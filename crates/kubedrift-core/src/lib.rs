pub mod catalog;
pub mod console;
pub mod error;
pub mod last_target;
pub mod network;
pub mod reconcile;
pub mod selector;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{CatalogEntry, ContextCatalog, KubeconfigLoader};
pub use console::{Console, PrefixConsole, Question};
pub use error::{ConfigurationError, PromptError, SessionError};
pub use last_target::{LastTarget, LastTargetStore};
pub use reconcile::{DriftReconciler, ReconcileOptions, ReconciliationOutcome};
pub use selector::ContextSelector;
pub use session::{KubeSessionFactory, Session, SessionFactory, SessionRequest};
