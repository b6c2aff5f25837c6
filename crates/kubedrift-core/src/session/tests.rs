use super::*;
use crate::test_support::{fixture_catalog, KUBECONFIG_FIXTURE};

#[test]
fn request_treats_empty_strings_as_absent() {
    let request = SessionRequest::new("", "", false);
    assert_eq!(request, SessionRequest::default());

    let request = SessionRequest::new("prod", "web", true);
    assert_eq!(request.context.as_deref(), Some("prod"));
    assert_eq!(request.namespace.as_deref(), Some("web"));
}

#[test]
fn resolve_defaults_to_current_context_and_default_namespace() {
    let target = resolve_target(&fixture_catalog(), &SessionRequest::default()).unwrap();
    assert_eq!(target.context, "staging");
    assert_eq!(target.namespace, DEFAULT_NAMESPACE);
    assert!(!target.needs_write());
}

#[test]
fn resolve_uses_namespace_bound_to_context() {
    let target = resolve_target(&fixture_catalog(), &SessionRequest::new("prod", "", false)).unwrap();
    assert_eq!(target.namespace, "shop");
    assert!(!target.switch_context);
}

#[test]
fn explicit_namespace_wins() {
    let target = resolve_target(&fixture_catalog(), &SessionRequest::new("prod", "web", false)).unwrap();
    assert_eq!(target.namespace, "web");
    assert_eq!(target.bind_namespace, None);
}

#[test]
fn force_switch_marks_context_and_namespace_for_writing() {
    let target = resolve_target(&fixture_catalog(), &SessionRequest::new("prod", "web", true)).unwrap();
    assert!(target.switch_context);
    assert_eq!(target.bind_namespace.as_deref(), Some("web"));
}

#[test]
fn force_switch_to_active_context_writes_nothing() {
    let target = resolve_target(&fixture_catalog(), &SessionRequest::new("staging", "", true)).unwrap();
    assert!(!target.needs_write());

    let target = resolve_target(&fixture_catalog(), &SessionRequest::new("prod", "shop", true)).unwrap();
    assert!(target.switch_context);
    assert_eq!(target.bind_namespace, None);
}

#[test]
fn resolve_errors_on_unknown_or_missing_context() {
    let err = resolve_target(&fixture_catalog(), &SessionRequest::new("nope", "", false)).unwrap_err();
    assert!(matches!(err, ConfigurationError::UnknownContext(ref c) if c == "nope"));

    let catalog = ContextCatalog::new(None).with_context("a", "a", None);
    let err = resolve_target(&catalog, &SessionRequest::default()).unwrap_err();
    assert!(matches!(err, ConfigurationError::NoCurrentContext));
}

#[test]
fn session_exposes_target() {
    let session = Session::new((), "kind-dev", "web", false);
    assert_eq!(session.target(), LastTarget::new("kind-dev", "web"));
    assert!(session.is_local_kubernetes());
    assert!(!session.is_in_cluster());
    assert_eq!(format!("{session:?}"), r#"Session { context: "kind-dev", namespace: "web", in_cluster: false, .. }"#);
}

#[test]
fn local_context_detection() {
    for ctx in ["minikube", "docker-desktop", "kind-test", "k3d-local", "orbstack"] {
        assert!(is_local_context(ctx), "{ctx}");
    }
    for ctx in ["prod", "gke_project_zone_cluster", "kindly"] {
        assert!(!is_local_context(ctx), "{ctx}");
    }
}

#[test]
fn in_cluster_requires_service_env_and_token() {
    let dir = tempfile::tempdir().unwrap();
    let token = dir.path().join("token");
    assert!(!is_in_cluster_env(Some("10.96.0.1"), Some("443"), &token));

    std::fs::write(&token, "secret").unwrap();
    assert!(is_in_cluster_env(Some("10.96.0.1"), Some("443"), &token));
    assert!(!is_in_cluster_env(None, Some("443"), &token));
    assert!(!is_in_cluster_env(Some(""), Some("443"), &token));
}

fn fixture_factory(dir: &Path, contents: &str) -> (KubeSessionFactory, std::path::PathBuf) {
    let path = dir.join("config");
    std::fs::write(&path, contents).unwrap();
    let factory = KubeSessionFactory::new(KubeconfigLoader::from_paths(vec![path.clone()])).with_in_cluster(false);
    (factory, path)
}

#[tokio::test]
async fn factory_builds_session_for_current_context() {
    let dir = tempfile::tempdir().unwrap();
    let (factory, path) = fixture_factory(dir.path(), KUBECONFIG_FIXTURE);

    let session = factory.build_default().await.unwrap();

    assert_eq!(session.context(), "staging");
    assert_eq!(session.namespace(), "default");
    assert!(!session.is_in_cluster());
    assert_eq!(std::fs::read_to_string(path).unwrap(), KUBECONFIG_FIXTURE);
}

#[tokio::test]
async fn factory_force_switch_persists_context() {
    let dir = tempfile::tempdir().unwrap();
    let (factory, _) = fixture_factory(dir.path(), KUBECONFIG_FIXTURE);

    let session = factory.build_session(&SessionRequest::new("prod", "payments", true)).await.unwrap();

    assert_eq!(session.context(), "prod");
    assert_eq!(session.namespace(), "payments");
    let catalog = factory.loader().catalog().unwrap();
    assert_eq!(catalog.current_context(), Some("prod"));
    assert_eq!(catalog.get("prod").unwrap().namespace.as_deref(), Some("payments"));
}

#[tokio::test]
async fn factory_failure_leaves_kubeconfig_untouched() {
    let broken = KUBECONFIG_FIXTURE.replace(
        "contexts:\n",
        "contexts:\n- name: broken\n  context:\n    cluster: ghost-cluster\n    user: admin\n",
    );
    let dir = tempfile::tempdir().unwrap();
    let (factory, path) = fixture_factory(dir.path(), &broken);

    let err = factory.build_session(&SessionRequest::new("broken", "", true)).await.unwrap_err();

    assert!(matches!(err, SessionError::ClientConstruction { ref context, .. } if context == "broken"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), broken);
}

#[tokio::test]
#[ignore] // requires a running cluster
async fn ensure_namespace_against_live_cluster() {
    let factory = KubeSessionFactory::new(KubeconfigLoader::from_env());
    let session = factory.build_default().await.unwrap();
    let created = session.ensure_namespace().await.unwrap();
    println!("namespace {} created: {created}", session.namespace());
}
