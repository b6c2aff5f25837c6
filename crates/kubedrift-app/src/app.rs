use kubedrift_config::AppConfig;
use kubedrift_core::selector::excluded_host;
use kubedrift_core::{
    Console, ContextCatalog, ContextSelector, DriftReconciler, KubeSessionFactory, KubeconfigLoader, LastTarget,
    LastTargetStore, ReconcileOptions, SessionFactory, SessionRequest,
};

use crate::cli::{Command, UseArgs};
use crate::console::TerminalConsole;

pub async fn run(command: Command, config: &AppConfig, mut console: TerminalConsole) -> anyhow::Result<()> {
    match command {
        Command::Use(args) => use_target(&args, config, &mut console).await,
        Command::Contexts { allow_private } => {
            let catalog = KubeconfigLoader::from_env().catalog()?;
            for name in catalog.names() {
                println!("{}", context_line(&catalog, &name, allow_private || config.general.allow_private));
            }
            Ok(())
        }
        Command::Last => {
            let store = LastTargetStore::new(&config.state.last_target_file);
            println!("{}", last_target_line(store.load().as_ref()));
            Ok(())
        }
        Command::InitConfig => {
            let path = AppConfig::init_default()?;
            println!("Wrote default config to {}", path.display());
            Ok(())
        }
    }
}

async fn use_target(args: &UseArgs, config: &AppConfig, console: &mut TerminalConsole) -> anyhow::Result<()> {
    let factory = KubeSessionFactory::new(KubeconfigLoader::from_env());
    let interactive = console.is_interactive();

    let context = if args.select {
        let catalog = factory.loader().catalog()?;
        let allow_private = args.allow_private || config.general.allow_private;
        Some(ContextSelector::new(&mut *console, allow_private).select(&catalog, catalog.current_context())?)
    } else {
        args.context.clone()
    };

    let request = SessionRequest {
        context,
        namespace: args.namespace.clone(),
        force_switch: args.switch_context || config.general.switch_context,
    };
    let session = factory.build_session(&request).await?;

    let store = LastTargetStore::new(&config.state.last_target_file);
    let last = store.load();
    let options = ReconcileOptions {
        interactive,
        suppress_warning: suppress_warning(args),
        default_namespace_delay: config.default_namespace_delay(),
    };
    let (session, outcome) =
        DriftReconciler::new(&factory, &mut *console, options).reconcile(session, last.as_ref()).await?;
    tracing::debug!(?outcome, "resolved deployment target");

    if args.create_namespace && session.ensure_namespace().await? {
        console.info(&format!("Created namespace '{}'", session.namespace()));
    }

    if !args.no_record {
        store.save(session.context(), session.namespace())?;
    }

    println!("{}/{}", session.context(), session.namespace());
    Ok(())
}

/// A target given explicitly on the command line is not second-guessed.
fn suppress_warning(args: &UseArgs) -> bool {
    args.no_warn || args.select || args.context.is_some() || args.namespace.is_some()
}

fn context_line(catalog: &ContextCatalog, name: &str, allow_private: bool) -> String {
    let marker = if catalog.current_context() == Some(name) { "*" } else { " " };
    let note = if allow_private {
        String::new()
    } else {
        match excluded_host(catalog, name) {
            Ok(Some(host)) => format!("  (private: {host})"),
            Ok(None) => String::new(),
            Err(e) => format!("  ({e})"),
        }
    };
    format!("{marker} {name}{note}")
}

fn last_target_line(last: Option<&LastTarget>) -> String {
    match last {
        Some(target) => match target.recorded_at {
            Some(ts) => format!("{}/{} (recorded {ts})", target.context, target.namespace),
            None => format!("{}/{}", target.context, target.namespace),
        },
        None => "No previous target recorded".to_string(),
    }
}
