//! Padel tracker binary: replays a recorded list of operator actions and prints the results.

use std::{env, fs, path::PathBuf, sync::Arc};

use anyhow::{Context, bail};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use padel_tracker::{
    config::AppConfig,
    dao::match_store::MemoryStore,
    services::{health_service, match_service, share_service},
    state::{AppState, MatchAction},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let Some(path) = env::args_os().nth(1).map(PathBuf::from) else {
        bail!("usage: padel-tracker <actions.json>");
    };

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("reading actions from {}", path.display()))?;
    let actions: Vec<MatchAction> =
        serde_json::from_str(&contents).context("parsing actions file")?;

    let app_state = AppState::new(AppConfig::load());
    let store = Arc::new(MemoryStore::new());
    app_state.install_match_store(store.clone()).await;
    app_state.install_share_store(store).await;
    info!(status = %health_service::health_status(&app_state).await.status, "stores ready");

    let count = actions.len();
    let (session, absorbed) = match_service::replay(&app_state, actions).await;
    info!(count, absorbed, screen = ?session.screen, "actions replayed");

    let summary = match_service::current_summary(&app_state)
        .await
        .context("computing match summary")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("serializing match summary")?
    );

    match share_service::results_link(&app_state).await {
        Ok(link) => println!("{link}"),
        Err(err) => warn!(error = %err, "no results link for an unfinished match"),
    }

    Ok(())
}

/// Configure tracing subscribers; logs go to stderr so stdout stays machine readable.
fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
