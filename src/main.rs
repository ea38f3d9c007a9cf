//! Duel Arena - headless match runner
//!
//! Runs one match on a tokio frame clock with a scripted sparring partner
//! holding the player controls, then reports the result to the profile
//! service when one is configured.

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use duel_arena::app::AppState;
use duel_arena::config::Config;
use duel_arena::game::sparring::SparringPartner;
use duel_arena::game::{GameMatch, MatchHandle, MatchMsg, Simulation};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Duel Arena");
    info!(
        mode = %config.mode,
        seed = config.seed,
        style = %config.player.style.id,
        tick_rate = config.tick_rate,
        "Match configuration"
    );

    // Create application state
    let state = AppState::new(config)?;
    let config = state.config.clone();

    let simulation = Simulation::new(&config.match_setup(), config.seed);
    let (game_match, handle) = GameMatch::new(
        Uuid::new_v4(),
        simulation,
        config.tick_rate,
        config.snapshot_every,
    );
    state.match_registry.insert(handle.clone());

    // Subscribe before the first tick so no snapshot is missed
    let snapshots = handle.subscribe();
    let sparring = tokio::spawn(drive_player(handle.clone(), snapshots));
    let mut match_task = tokio::spawn(game_match.run());

    let report = tokio::select! {
        result = &mut match_task => result?,
        _ = shutdown_signal() => {
            handle.stop().await;
            match_task.await?
        }
    };

    sparring.abort();
    state.match_registry.remove(&handle.id);

    let Some(report) = report else {
        info!("Match aborted before a winner was decided");
        return Ok(());
    };

    info!(
        did_win = report.did_win,
        player_rounds = report.player_rounds,
        enemy_rounds = report.enemy_rounds,
        total_rounds = report.total_rounds,
        "Final result"
    );

    if let Some(profiles) = &state.profiles {
        match profiles.award_match_xp(&report).await {
            Ok(award) => info!(xp = award.xp_awarded, did_win = award.did_win, "XP awarded"),
            Err(e) => error!(error = %e, "Failed to award match XP"),
        }
    }

    info!("Shutdown complete");
    Ok(())
}

/// Feed sparring input from every broadcast snapshot until the match ends
async fn drive_player(handle: MatchHandle, mut rx: broadcast::Receiver<MatchMsg>) {
    let partner = SparringPartner::new();

    loop {
        match rx.recv().await {
            Ok(MatchMsg::Snapshot(snapshot)) => {
                if !handle.send_input(partner.next_input(&snapshot)).await {
                    break;
                }
            }
            Ok(MatchMsg::MatchEnd { .. }) | Ok(MatchMsg::Aborted { .. }) => break,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Sparring partner fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping match");
        }
        _ = terminate => {
            info!("Received terminate signal, stopping match");
        }
    }
}
