use std::time::Duration;

use tracing::level_filters::LevelFilter;

use crate::console::{Console, Question};
use crate::error::SessionError;
use crate::last_target::LastTarget;
use crate::session::{Session, SessionFactory, SessionRequest, DEFAULT_NAMESPACE};

pub const DEFAULT_NAMESPACE_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Whether the user can answer prompts. Without it drift is only reported.
    pub interactive: bool,
    pub suppress_warning: bool,
    pub default_namespace_delay: Duration,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self { interactive: false, suppress_warning: false, default_namespace_delay: DEFAULT_NAMESPACE_DELAY }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    Unchanged,
    ContextChanged { context: String, namespace: Option<String> },
    NamespaceChanged { namespace: String },
}

impl ReconciliationOutcome {
    fn rebuild_request<C>(&self, current: &Session<C>) -> Option<SessionRequest> {
        match self {
            Self::Unchanged => None,
            Self::ContextChanged { context, namespace } => {
                Some(SessionRequest { context: Some(context.clone()), namespace: namespace.clone(), force_switch: true })
            }
            Self::NamespaceChanged { namespace } => Some(SessionRequest {
                context: Some(current.context().to_string()),
                namespace: Some(namespace.clone()),
                force_switch: true,
            }),
        }
    }
}

/// Compares a fresh session with the target of the previous run and lets
/// the user go back to it. Context drift is checked before namespace drift,
/// and only one of them is resolved per run.
pub struct DriftReconciler<'f, F, C> {
    factory: &'f F,
    console: C,
    options: ReconcileOptions,
}

impl<'f, F: SessionFactory, C: Console> DriftReconciler<'f, F, C> {
    pub fn new(factory: &'f F, console: C, options: ReconcileOptions) -> Self {
        Self { factory, console, options }
    }

    pub async fn reconcile(
        &mut self,
        session: Session<F::Client>,
        last: Option<&LastTarget>,
    ) -> Result<(Session<F::Client>, ReconciliationOutcome), SessionError> {
        let checks_enabled = !self.options.suppress_warning && self.console.level() >= LevelFilter::INFO;

        let outcome = match last {
            Some(last) if checks_enabled => self.check_drift(&session, last)?,
            _ => ReconciliationOutcome::Unchanged,
        };
        tracing::debug!(?outcome, "kube context check finished");

        let session = match outcome.rebuild_request(&session) {
            Some(request) => self.factory.build_session(&request).await?,
            None => session,
        };

        if checks_enabled
            && session.namespace() == DEFAULT_NAMESPACE
            && last.map_or(true, |l| l.namespace != DEFAULT_NAMESPACE)
        {
            self.console.warn(
                "Deploying into the 'default' namespace is usually not a good idea as this namespace cannot be deleted",
            );
            let secs = self.options.default_namespace_delay.as_secs();
            self.console.start_wait(&format!("Will continue in {secs} seconds..."));
            tokio::time::sleep(self.options.default_namespace_delay).await;
            self.console.stop_wait();
        }

        self.console.info(&format!("Using namespace '{}'", session.namespace()));
        self.console.info(&format!("Using kube context '{}'", session.context()));

        Ok((session, outcome))
    }

    fn check_drift(
        &mut self,
        session: &Session<F::Client>,
        last: &LastTarget,
    ) -> Result<ReconciliationOutcome, SessionError> {
        if !last.context.is_empty() && last.context != session.context() {
            self.warn_drift("Are you using the correct kube context?", "kube context", session.context(), &last.context);
            if !self.options.interactive {
                return Ok(ReconciliationOutcome::Unchanged);
            }

            let choice = self.ask("Which context do you want to use?", session.context(), &last.context)?;
            if choice != session.context() {
                let namespace = (!last.namespace.is_empty()).then(|| last.namespace.clone());
                return Ok(ReconciliationOutcome::ContextChanged { context: choice, namespace });
            }
        } else if !last.namespace.is_empty() && last.namespace != session.namespace() {
            self.warn_drift("Are you using the correct namespace?", "namespace", session.namespace(), &last.namespace);
            if !self.options.interactive {
                return Ok(ReconciliationOutcome::Unchanged);
            }

            let choice = self.ask("Which namespace do you want to use?", session.namespace(), &last.namespace)?;
            if choice != session.namespace() {
                return Ok(ReconciliationOutcome::NamespaceChanged { namespace: choice });
            }
        }

        Ok(ReconciliationOutcome::Unchanged)
    }

    fn warn_drift(&mut self, headline: &str, what: &str, current: &str, last: &str) {
        self.console.write_line("");
        self.console.warn(headline);
        self.console.warn(&format!("Current {what}: '{current}'"));
        self.console.warn(&format!("Last    {what}: '{last}'"));
    }

    fn ask(&mut self, message: &str, current: &str, last: &str) -> Result<String, SessionError> {
        let question = Question::new(message, vec![current.to_string(), last.to_string()]).with_default(current);
        self.console.question(&question).map_err(SessionError::ReconciliationAborted)
    }
}
