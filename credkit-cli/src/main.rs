//! Developer CLI for CredKit.
//!
//! Drives the credential flow end-to-end against a scripted in-process
//! service, one named scenario per service behavior, printing every flow
//! event and the final observable snapshot. Also inspects the on-disk
//! preference store the flow uses as its offline fallback.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use credkit_core::{
    defaults, Credential, CredentialFlow, FlowEvent, Identity, OutcomeStatus,
    ResolutionOutcome, StatusCode,
};
use credkit_store::{FileStore, MemoryStore, PreferenceStore};
use eyre::{Result, WrapErr};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

mod scripted;

use scripted::{PromptlessHost, ScriptedService};

/// Default path of the on-disk preference store.
const DEFAULT_STORE_PATH: &str = "credkit-store.cbor";

#[derive(Parser)]
#[command(name = "credkit", version, about = "CredKit developer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a named end-to-end scenario and print each flow event.
    Demo {
        /// The service behavior to script.
        scenario: Scenario,
        /// Silently drop hint-only outcomes instead of resolving them.
        #[arg(long)]
        no_resolve_hints: bool,
        /// Back the flow's preference cache with this file instead of
        /// memory.
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Inspect or clear the on-disk preference store.
    Store {
        #[command(subcommand)]
        command: StoreCommand,
    },
}

#[derive(Subcommand)]
enum StoreCommand {
    /// Print the cached identity, if any.
    Show {
        /// Path of the store file.
        #[arg(long, default_value = DEFAULT_STORE_PATH)]
        path: PathBuf,
    },
    /// Remove every cached entry.
    Clear {
        /// Path of the store file.
        #[arg(long, default_value = DEFAULT_STORE_PATH)]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// A single stored credential signs in silently.
    AutoSignIn,
    /// A hint is offered, accepted, and auto-saved.
    Hint,
    /// Multiple stored credentials require a picker.
    Picker,
    /// The service is unreachable and the cache is empty.
    Offline,
    /// The service is unreachable but a cached identity exists.
    OfflineCached,
    /// Sign in, then delete the loaded credential.
    Delete,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Demo {
            scenario,
            no_resolve_hints,
            store,
        } => run_demo(scenario, !no_resolve_hints, store).await,
        Command::Store { command } => match command {
            StoreCommand::Show { path } => show_store(&path),
            StoreCommand::Clear { path } => clear_store(&path),
        },
    }
}

fn demo_identity() -> Identity {
    Identity::named("demo@example.com", "Demo User")
}

/// Scripts the service for `scenario` and returns the outcome the simulated
/// user will deliver if a resolution is launched.
fn script(service: &ScriptedService, scenario: Scenario) -> Option<ResolutionOutcome> {
    match scenario {
        Scenario::AutoSignIn => {
            service.on_request(Ok(Credential::confirmed(demo_identity())));
            None
        }
        Scenario::Hint => {
            service.on_request(Err(OutcomeStatus::needs_resolution(
                StatusCode::SignInRequired,
            )));
            service.on_save(Ok(()));
            Some(ResolutionOutcome::Retrieved(Identity::new(
                "hint@example.com",
            )))
        }
        Scenario::Picker => {
            service.on_request(Err(OutcomeStatus::needs_resolution(
                StatusCode::ResolutionRequired,
            )));
            Some(ResolutionOutcome::Retrieved(demo_identity()))
        }
        Scenario::Offline | Scenario::OfflineCached => {
            service.on_request(Err(OutcomeStatus::failure(StatusCode::NetworkError)));
            None
        }
        Scenario::Delete => {
            service.on_request(Ok(Credential::confirmed(demo_identity())));
            service.on_delete(Ok(()));
            None
        }
    }
}

async fn run_demo(
    scenario: Scenario,
    resolve_hints: bool,
    store_path: Option<PathBuf>,
) -> Result<()> {
    let cache: Arc<dyn PreferenceStore> = match store_path {
        Some(path) => Arc::new(FileStore::new(path)),
        None => Arc::new(MemoryStore::new()),
    };

    if scenario == Scenario::OfflineCached {
        let identity = demo_identity();
        cache
            .put(defaults::PREF_IDENTIFIER, &identity.identifier)
            .wrap_err("seeding preference store")?;
        if let Some(name) = &identity.display_name {
            cache
                .put(defaults::PREF_DISPLAY_NAME, name)
                .wrap_err("seeding preference store")?;
        }
    }

    let service = ScriptedService::new();
    let user_outcome = script(&service, scenario);

    let (mut flow, mut events) = CredentialFlow::new(service, Arc::new(PromptlessHost), cache);

    // Terminal failures surface as Failure events; the demo keeps going so
    // they get printed.
    let _outcome = flow.request_credentials(resolve_hints).await;
    print_events(&mut events);

    if let (Some(outcome), Some(kind)) = (user_outcome, flow.pending_resolution()) {
        println!("» user completes the {kind} resolution");
        let _outcome = flow.on_resolution_complete(kind, outcome).await;
        print_events(&mut events);
    }

    if scenario == Scenario::Delete {
        let _outcome = flow.delete_credential().await;
        print_events(&mut events);
    }

    let snapshot = flow.snapshot();
    println!("state: {}", snapshot.state);
    match snapshot.identity {
        Some(identity) => println!("identity: {identity}"),
        None => println!("identity: none"),
    }
    println!("retry visible: {}", snapshot.retry_visible);
    Ok(())
}

fn print_events(receiver: &mut UnboundedReceiver<FlowEvent>) {
    while let Ok(event) = receiver.try_recv() {
        match event {
            FlowEvent::CredentialRetrieved(identity) => {
                println!("✓ credential retrieved for {identity}");
            }
            FlowEvent::HintRetrieved(identity) => {
                println!("· hint retrieved for {identity}");
            }
            FlowEvent::CredentialSaved => println!("✓ credential saved"),
            FlowEvent::CredentialDeleted => println!("✓ credential deleted"),
            FlowEvent::SignedInFromCache(identity) => {
                println!("✓ signed in from cache as {identity}");
            }
            FlowEvent::Failure(error) => println!("✗ {error}"),
        }
    }
}

fn show_store(path: &Path) -> Result<()> {
    let store = FileStore::new(path);
    let identifier = store
        .get(defaults::PREF_IDENTIFIER)
        .wrap_err_with(|| format!("reading {}", path.display()))?;
    match identifier {
        Some(identifier) => {
            let display_name = store
                .get(defaults::PREF_DISPLAY_NAME)
                .wrap_err_with(|| format!("reading {}", path.display()))?
                .filter(|name| !name.is_empty());
            let identity = Identity {
                identifier,
                display_name,
            };
            println!("cached identity: {identity}");
        }
        None => println!("cached identity: none"),
    }
    Ok(())
}

fn clear_store(path: &Path) -> Result<()> {
    let store = FileStore::new(path);
    store
        .clear_all()
        .wrap_err_with(|| format!("clearing {}", path.display()))?;
    println!("cleared {}", path.display());
    Ok(())
}
