//! mojo-migrate - brings a stored world up to the installed system version.

use std::sync::Arc;

use mojo_domain::SystemManifest;
use mojo_engine::infrastructure::{
    app_settings::EngineConfig,
    clock::SystemClock,
    document_store::JsonWorldStore,
    notifications::TracingNotifier,
    ports::ClockPort,
    settings::SqliteSettingsRepo,
};
use mojo_engine::use_cases::MigrationOutcome;
use mojo_engine::App;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root when run through cargo from `crates/engine`.
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mojo_engine=info,mojo_migrate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::from_env();
    tracing::info!(
        world_dir = %config.world_dir.display(),
        world_id = %config.world_id,
        settings_db = %config.settings_db,
        "Starting mojo-migrate"
    );

    let manifest = SystemManifest::builtin(config.system_version.as_deref())?;
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let settings_repo = Arc::new(SqliteSettingsRepo::new(&config.settings_db, clock.clone()).await?);
    let store = Arc::new(JsonWorldStore::new(&config.world_dir));

    let app = App::new(
        manifest,
        store,
        settings_repo,
        Arc::new(TracingNotifier::new()),
        clock,
    )?;

    // Ctrl-C stops the batch at the next document boundary.
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current document");
            on_interrupt.cancel();
        }
    });

    match app
        .use_cases
        .migration
        .execute(&config.world_id, &cancel)
        .await?
    {
        MigrationOutcome::VersionRecorded(version) => {
            tracing::info!(version = %version, "Nothing to migrate");
        }
        MigrationOutcome::UpToDate => {
            tracing::info!(version = %app.manifest.version, "World already migrated");
        }
        MigrationOutcome::Completed(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.cancelled {
                anyhow::bail!("migration cancelled; run again to finish");
            }
        }
    }

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
