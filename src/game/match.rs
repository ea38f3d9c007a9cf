//! Async match driver and registry of running matches

use dashmap::DashMap;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;
use tracing::{info, warn};
use uuid::Uuid;

use crate::util::time::{tick_interval, FrameClock};

use super::input::InputSnapshot;
use super::simulation::Simulation;
use super::snapshot::{MatchMsg, MatchReport, SnapshotBuilder};

/// Commands accepted by a running match
#[derive(Debug, Clone)]
pub enum MatchCommand {
    /// Replace the held player input
    Input(InputSnapshot),
    /// Stop ticking; no state changes after this is observed
    Stop,
}

/// Handle to a running match
#[derive(Clone)]
pub struct MatchHandle {
    pub id: Uuid,
    pub command_tx: mpsc::Sender<MatchCommand>,
    pub snapshot_tx: broadcast::Sender<MatchMsg>,
}

impl MatchHandle {
    /// Queue the player's held input. Returns false once the match is gone.
    pub async fn send_input(&self, input: InputSnapshot) -> bool {
        self.command_tx.send(MatchCommand::Input(input)).await.is_ok()
    }

    pub async fn stop(&self) {
        if self.command_tx.send(MatchCommand::Stop).await.is_err() {
            warn!(match_id = %self.id, "Stop requested for a match that already exited");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MatchMsg> {
        self.snapshot_tx.subscribe()
    }
}

/// Registry of all active matches
pub struct MatchRegistry {
    matches: DashMap<Uuid, MatchHandle>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self {
            matches: DashMap::new(),
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<MatchHandle> {
        self.matches.get(id).map(|m| m.value().clone())
    }

    pub fn insert(&self, handle: MatchHandle) {
        self.matches.insert(handle.id, handle);
    }

    pub fn remove(&self, id: &Uuid) -> Option<MatchHandle> {
        self.matches.remove(id).map(|(_, h)| h)
    }

    pub fn active_matches(&self) -> usize {
        self.matches.len()
    }
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A simulation driven by a tokio frame clock
pub struct GameMatch {
    id: Uuid,
    simulation: Simulation,
    command_rx: mpsc::Receiver<MatchCommand>,
    snapshot_tx: broadcast::Sender<MatchMsg>,
    snapshot_builder: SnapshotBuilder,
    tick_rate: u32,
    current_input: InputSnapshot,
}

impl GameMatch {
    /// Create a new match
    pub fn new(
        id: Uuid,
        simulation: Simulation,
        tick_rate: u32,
        snapshot_every: u32,
    ) -> (Self, MatchHandle) {
        let (command_tx, command_rx) = mpsc::channel(256);
        let (snapshot_tx, _) = broadcast::channel(64);

        let handle = MatchHandle {
            id,
            command_tx,
            snapshot_tx: snapshot_tx.clone(),
        };

        let game_match = Self {
            id,
            simulation,
            command_rx,
            snapshot_tx,
            snapshot_builder: SnapshotBuilder::new(snapshot_every),
            tick_rate,
            current_input: InputSnapshot::default(),
        };

        (game_match, handle)
    }

    /// Run the tick loop until the match ends or is stopped.
    /// Returns the final report if a winner was decided.
    pub async fn run(mut self) -> Option<MatchReport> {
        info!(match_id = %self.id, mode = %self.simulation.mode(), "Match started");

        let mut ticker = interval(tick_interval(self.tick_rate));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut clock = FrameClock::new();

        loop {
            ticker.tick().await;

            // Drain command queue
            if self.process_commands() {
                self.simulation.stop();
                info!(match_id = %self.id, "Match stopped");
                break;
            }

            let snapshot = self.simulation.tick(clock.lap(), &self.current_input);
            let ended = snapshot.match_ended;

            if let Some(msg) = self.snapshot_builder.push(snapshot) {
                // No subscribers is fine
                let _ = self.snapshot_tx.send(msg);
            }

            if ended {
                break;
            }
        }

        let report = self.simulation.report();
        let final_msg = match &report {
            Some(report) => {
                info!(
                    match_id = %self.id,
                    did_win = report.did_win,
                    player_rounds = report.player_rounds,
                    enemy_rounds = report.enemy_rounds,
                    "Match ended"
                );
                MatchMsg::MatchEnd {
                    report: report.clone(),
                }
            }
            None => {
                // Events from unsent ticks go out before the abort notice
                if let Some(msg) = self.snapshot_builder.flush(self.simulation.snapshot()) {
                    let _ = self.snapshot_tx.send(msg);
                }
                MatchMsg::Aborted {
                    tick: self.simulation.snapshot().tick,
                }
            }
        };
        let _ = self.snapshot_tx.send(final_msg);

        report
    }

    /// Apply queued commands; true if the match must stop
    fn process_commands(&mut self) -> bool {
        loop {
            match self.command_rx.try_recv() {
                Ok(MatchCommand::Input(input)) => self.current_input = input,
                Ok(MatchCommand::Stop) => return true,
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Disconnected) => {
                    info!(match_id = %self.id, "All handles dropped, ending match");
                    return true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::fighter::Loadout;
    use crate::game::simulation::MatchSetup;
    use crate::game::GameMode;
    use std::time::Duration;

    fn new_match() -> (GameMatch, MatchHandle) {
        new_match_every(1)
    }

    fn new_match_every(snapshot_every: u32) -> (GameMatch, MatchHandle) {
        let loadout = Loadout::from_ids("taijutsu", &["fireball"]).unwrap();
        let sim = Simulation::new(&MatchSetup::mirror(loadout, GameMode::Standard), 1);
        GameMatch::new(Uuid::new_v4(), sim, 120, snapshot_every)
    }

    #[tokio::test]
    async fn test_stop_ends_run_without_report() {
        let (game_match, handle) = new_match();
        let mut rx = handle.subscribe();
        let task = tokio::spawn(game_match.run());

        // Let a few frames go by
        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("no snapshot in time")
            .unwrap();
        assert!(matches!(first, MatchMsg::Snapshot(_)));

        handle.stop().await;
        let report = tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("match did not stop")
            .unwrap();
        assert!(report.is_none());

        // The last message is the abort notice
        let mut last = None;
        loop {
            match rx.try_recv() {
                Ok(msg) => last = Some(msg),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        assert!(matches!(last, Some(MatchMsg::Aborted { .. })));
    }

    #[tokio::test]
    async fn test_stop_flushes_buffered_events() {
        // Snapshots are throttled far past the match lifetime
        let (game_match, handle) = new_match_every(10_000);
        let mut rx = handle.subscribe();
        assert!(
            handle
                .send_input(InputSnapshot {
                    attack: true,
                    ..Default::default()
                })
                .await
        );
        let task = tokio::spawn(game_match.run());

        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.stop().await;
        assert!(task.await.unwrap().is_none());

        let mut messages = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            messages.push(msg);
        }
        assert_eq!(messages.len(), 2);
        match &messages[0] {
            MatchMsg::Snapshot(snap) => assert!(!snap.events.is_empty()),
            other => panic!("expected flushed snapshot, got {:?}", other),
        }
        assert!(matches!(messages[1], MatchMsg::Aborted { .. }));
    }

    #[tokio::test]
    async fn test_held_input_moves_player() {
        let (game_match, handle) = new_match();
        let mut rx = handle.subscribe();
        assert!(
            handle
                .send_input(InputSnapshot {
                    move_right: true,
                    ..Default::default()
                })
                .await
        );
        let task = tokio::spawn(game_match.run());

        let moved = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if let Ok(MatchMsg::Snapshot(snap)) = rx.recv().await {
                    if snap.player.x > 200.0 {
                        return snap;
                    }
                }
            }
        })
        .await
        .expect("player never moved");
        assert!(moved.player.facing_right);

        handle.stop().await;
        task.await.unwrap();
    }

    #[test]
    fn test_dropping_handles_ends_match() {
        let (game_match, handle) = new_match();
        drop(handle);
        let report = tokio_test::block_on(game_match.run());
        assert!(report.is_none());
    }

    #[test]
    fn test_registry() {
        let registry = MatchRegistry::new();
        let (_m1, h1) = new_match();
        let (_m2, h2) = new_match();
        let id = h1.id;

        registry.insert(h1);
        registry.insert(h2);
        assert_eq!(registry.active_matches(), 2);
        assert_eq!(registry.get(&id).map(|h| h.id), Some(id));

        assert!(registry.remove(&id).is_some());
        assert!(registry.get(&id).is_none());
        assert_eq!(registry.active_matches(), 1);
    }
}
