use crate::catalog::ContextCatalog;
use crate::console::{Console, Question};
use crate::error::{ConfigurationError, SessionError};
use crate::network;

/// Interactive context picker. Rejects clusters served from private
/// addresses unless `allow_private` is set, and asks again.
pub struct ContextSelector<C> {
    console: C,
    allow_private: bool,
}

impl<C: Console> ContextSelector<C> {
    pub fn new(console: C, allow_private: bool) -> Self {
        Self { console, allow_private }
    }

    /// Asks for a context, pre-selecting `default` when it is one of the options.
    pub fn select(&mut self, catalog: &ContextCatalog, default: Option<&str>) -> Result<String, SessionError> {
        if catalog.is_empty() {
            return Err(ConfigurationError::NoContexts.into());
        }

        let mut question = Question::new("Which kube context do you want to use", catalog.names());
        if let Some(default) = default.filter(|d| catalog.contains(d)) {
            question = question.with_default(default);
        }

        loop {
            let choice = self.console.question(&question)?;
            if !catalog.contains(&choice) {
                return Err(ConfigurationError::UnknownContext(choice).into());
            }

            if !self.allow_private {
                if let Some(host) = excluded_host(catalog, &choice)? {
                    self.console.info(&format!("Clusters with private ips ({host}) cannot be used"));
                    continue;
                }
            }

            tracing::debug!(context = %choice, "selected kube context");
            return Ok(choice);
        }
    }
}

/// Host of the context's cluster if it is excluded as private.
pub fn excluded_host(catalog: &ContextCatalog, context: &str) -> Result<Option<String>, ConfigurationError> {
    let Some(server) = catalog.server(context)? else { return Ok(None) };
    let host = network::server_host(server)?;
    Ok(network::is_excluded(&host).then_some(host))
}
