use std::cell::RefCell;
use std::collections::VecDeque;

use kube::config::Kubeconfig;
use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::catalog::ContextCatalog;
use crate::console::{Console, Question};
use crate::error::{PromptError, SessionError};
use crate::session::{resolve_target, Session, SessionFactory, SessionRequest};

pub const KUBECONFIG_FIXTURE: &str = r#"apiVersion: v1
kind: Config
current-context: staging
clusters:
- name: prod-cluster
  cluster:
    server: https://35.1.2.3:6443
- name: staging-cluster
  cluster:
    server: https://192.168.1.10:6443
- name: local-cluster
  cluster:
    server: https://kubernetes.docker.internal:6443
contexts:
- name: prod
  context:
    cluster: prod-cluster
    user: admin
    namespace: shop
- name: staging
  context:
    cluster: staging-cluster
    user: admin
- name: docker-desktop
  context:
    cluster: local-cluster
    user: admin
users:
- name: admin
  user:
    token: abc
"#;

pub fn fixture_catalog() -> ContextCatalog {
    ContextCatalog::from_kubeconfig(&Kubeconfig::from_yaml(KUBECONFIG_FIXTURE).unwrap())
}

/// Console that records everything and answers prompts from a script.
/// An exhausted script behaves like a non-interactive terminal.
pub struct RecordingConsole {
    pub entries: Vec<(Level, String)>,
    pub lines: Vec<String>,
    pub questions: Vec<Question>,
    pub waits: Vec<String>,
    answers: VecDeque<String>,
    level: LevelFilter,
}

impl RecordingConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: Vec::new(),
            lines: Vec::new(),
            questions: Vec::new(),
            waits: Vec::new(),
            answers: answers.into_iter().map(Into::into).collect(),
            level: LevelFilter::INFO,
        }
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn at(&self, level: Level) -> Vec<String> {
        self.entries.iter().filter(|(l, _)| *l == level).map(|(_, m)| m.clone()).collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.at(Level::WARN)
    }

    pub fn infos(&self) -> Vec<String> {
        self.at(Level::INFO)
    }
}

impl Console for RecordingConsole {
    fn log(&mut self, level: Level, message: &str) {
        self.entries.push((level, message.to_string()));
    }

    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn question(&mut self, question: &Question) -> Result<String, PromptError> {
        self.questions.push(question.clone());
        self.answers.pop_front().ok_or_else(|| PromptError::NotInteractive(question.message.clone()))
    }

    fn level(&self) -> LevelFilter {
        self.level
    }

    fn start_wait(&mut self, message: &str) {
        self.waits.push(message.to_string());
    }
}

/// Session factory over a synthetic catalog that records every request.
pub struct RecordingFactory {
    catalog: ContextCatalog,
    requests: RefCell<Vec<SessionRequest>>,
    switches: RefCell<Vec<String>>,
    fail: bool,
}

impl RecordingFactory {
    pub fn new(catalog: ContextCatalog) -> Self {
        Self { catalog, requests: RefCell::default(), switches: RefCell::default(), fail: false }
    }

    pub fn failing(catalog: ContextCatalog) -> Self {
        Self { fail: true, ..Self::new(catalog) }
    }

    pub fn requests(&self) -> Vec<SessionRequest> {
        self.requests.borrow().clone()
    }

    pub fn switches(&self) -> Vec<String> {
        self.switches.borrow().clone()
    }
}

impl SessionFactory for RecordingFactory {
    type Client = ();

    async fn build_session(&self, request: &SessionRequest) -> Result<Session<()>, SessionError> {
        self.requests.borrow_mut().push(request.clone());
        let target = resolve_target(&self.catalog, request)?;
        if self.fail {
            return Err(SessionError::client(&target.context, "invalid credentials"));
        }
        if target.needs_write() {
            self.switches.borrow_mut().push(target.context.clone());
        }
        Ok(Session::new((), target.context, target.namespace, false))
    }
}
