//! Game state machine and the orchestrator that owns every other component.
//!
//! [`Game`] holds the one authoritative [`GameSession`] and reacts to three
//! kinds of input: timer ticks popped from its [`Scheduler`], human
//! [`Command`]s, and inbound controller messages. All of them run on the
//! caller's thread, one at a time.

use crate::collision::obstacle_hits_player;
use crate::config::GameConfig;
use crate::geometry::{FieldGeometry, Geometry};
use crate::input::Command;
use crate::obstacles::{MoveOutcome, ObstacleId, ObstacleManager};
use crate::player::Player;
use crate::presentation::Presenter;
use crate::scheduler::{Scheduler, TimerId};
use crate::sync::{SyncEndpoint, Transport};
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::protocol::{Action, ObstacleReport, SnapshotDraft, Status};
use shared::Posture;

/// Everything the scheduler can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Score,
    Broadcast,
    Spawn,
    Move(ObstacleId),
    PostureRevert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameSession {
    pub score: u64,
    pub running: bool,
}

/// Per-process play statistics. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    pub sessions_started: u64,
    pub best_score: u64,
    pub last_score: u64,
}

pub struct Game<T: Transport, P: Presenter> {
    config: GameConfig,
    phase: Phase,
    session: GameSession,
    stats: SessionStats,
    scheduler: Scheduler<Tick>,
    player: Player,
    obstacles: ObstacleManager,
    geometry: Box<dyn Geometry>,
    sync: SyncEndpoint<T>,
    presenter: P,
    rng: StdRng,
    /// Score, broadcast and spawn timers of the current session.
    session_timers: Vec<TimerId>,
}

impl<T: Transport, P: Presenter> Game<T, P> {
    pub fn new(config: GameConfig, transport: T, presenter: P) -> Self {
        Self::with_geometry(config, Box::new(FieldGeometry::default()), transport, presenter)
    }

    pub fn with_geometry(
        config: GameConfig,
        geometry: Box<dyn Geometry>,
        transport: T,
        presenter: P,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            phase: Phase::Idle,
            session: GameSession::default(),
            stats: SessionStats::default(),
            scheduler: Scheduler::new(),
            player: Player::new(),
            obstacles: ObstacleManager::new(),
            geometry,
            sync: SyncEndpoint::new(transport),
            presenter,
            rng,
            session_timers: Vec::new(),
        }
    }

    /// Starts a session from `Idle` or `GameOver`. No-op while running.
    pub fn start(&mut self) {
        if self.phase == Phase::Running {
            debug!("Start requested while running, ignoring");
            return;
        }
        self.begin_session();
    }

    /// Throws away whatever is running and starts a fresh session.
    pub fn restart(&mut self) {
        info!("Restarting game");
        self.begin_session();
        self.sync.send_status(Status::Restart);
    }

    fn begin_session(&mut self) {
        self.cancel_session_timers();
        self.clear_obstacles();

        self.session = GameSession {
            score: 0,
            running: true,
        };
        self.phase = Phase::Running;
        self.presenter.hide_game_over();
        self.presenter.update_score(0);

        let spawned = self.obstacles.spawn_batch(
            &self.config.triad_fractions,
            self.geometry.field_width(),
            self.geometry.obstacle_width(),
            &mut self.rng,
            &mut self.scheduler,
            self.config.move_period_ms,
        );
        for id in spawned {
            if let Some(obstacle) = self.obstacles.get(id) {
                self.presenter.obstacle_spawned(obstacle);
            }
        }

        self.session_timers = vec![
            self.scheduler
                .schedule_repeating(Tick::Score, self.config.score_period_ms),
            self.scheduler
                .schedule_repeating(Tick::Broadcast, self.config.broadcast_period_ms),
            self.scheduler
                .schedule_repeating(Tick::Spawn, self.config.spawn_period_ms),
        ];

        self.stats.sessions_started += 1;
        info!(
            "Session {} started at t={}ms",
            self.stats.sessions_started,
            self.scheduler.now()
        );
    }

    fn game_over(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.cancel_session_timers();
        self.session.running = false;
        self.phase = Phase::GameOver;
        self.clear_obstacles();

        let score = self.session.score;
        self.stats.last_score = score;
        self.stats.best_score = self.stats.best_score.max(score);
        info!(
            "Game over at t={}ms with score {} (best {})",
            self.scheduler.now(),
            score,
            self.stats.best_score
        );

        self.presenter.show_game_over(score);
        self.sync.send_status(Status::GameOver);
    }

    fn cancel_session_timers(&mut self) {
        for timer in self.session_timers.drain(..) {
            self.scheduler.cancel(timer);
        }
    }

    fn clear_obstacles(&mut self) {
        for obstacle in self.obstacles.cancel_all(&mut self.scheduler) {
            self.presenter.obstacle_removed(&obstacle);
        }
    }

    /// Applies a player command.
    ///
    /// Jump starts the game from `Idle`, restarts it from `GameOver` and
    /// jumps while running. Crouch only does anything while running.
    pub fn command(&mut self, command: Command) {
        match (command, self.phase) {
            (Command::Jump, Phase::Idle) => self.start(),
            (Command::Jump, Phase::GameOver) => self.restart(),
            (Command::Jump, Phase::Running) => self.change_posture(Posture::Jumping),
            (Command::Crouch, Phase::Running) => self.change_posture(Posture::Crouching),
            (Command::Crouch, _) => trace!("Crouch ignored while {:?}", self.phase),
        }
    }

    fn change_posture(&mut self, posture: Posture) {
        if self
            .player
            .enter(posture, &mut self.scheduler, self.config.posture_duration_ms)
        {
            self.presenter.posture_changed(posture);
        }
    }

    /// Handles one inbound controller frame. Remote actions follow the same
    /// rules as human commands.
    pub fn handle_message(&mut self, text: &str) {
        match self.sync.on_message(text) {
            Some(Action::Jump) => self.command(Command::Jump),
            Some(Action::Crouch) => self.command(Command::Crouch),
            Some(Action::Nothing) | None => {}
        }
    }

    /// Runs every timer due at or before `time`, in deadline order.
    pub fn advance_to(&mut self, time: u64) {
        while let Some((timer, tick)) = self.scheduler.pop_due(time) {
            self.dispatch(timer, tick);
        }
        self.scheduler.set_now(time);
    }

    pub fn advance_by(&mut self, ms: u64) {
        let target = self.scheduler.now() + ms;
        self.advance_to(target);
    }

    pub fn next_deadline(&mut self) -> Option<u64> {
        self.scheduler.next_deadline()
    }

    fn dispatch(&mut self, timer: TimerId, tick: Tick) {
        match tick {
            Tick::Score => {
                if self.session.running {
                    self.session.score += 1;
                    self.presenter.update_score(self.session.score);
                }
            }
            Tick::Broadcast => {
                if self.session.running {
                    self.broadcast_snapshot();
                }
            }
            Tick::Spawn => {
                if self.session.running {
                    let id = self.obstacles.spawn_one(
                        self.config.entry_offset,
                        &mut self.rng,
                        &mut self.scheduler,
                        self.config.move_period_ms,
                    );
                    if let Some(obstacle) = self.obstacles.get(id) {
                        self.presenter.obstacle_spawned(obstacle);
                    }
                }
            }
            Tick::Move(id) => self.move_obstacle(timer, id),
            Tick::PostureRevert => {
                if self.player.on_revert(timer) {
                    self.presenter.posture_changed(Posture::Standing);
                }
            }
        }
    }

    /// One movement tick: collision check against the current position,
    /// then the position update.
    fn move_obstacle(&mut self, timer: TimerId, id: ObstacleId) {
        if !self.session.running {
            match self.obstacles.remove(id, &mut self.scheduler) {
                Some(obstacle) => self.presenter.obstacle_removed(&obstacle),
                None => {
                    self.scheduler.cancel(timer);
                }
            }
            return;
        }

        let hit = match self.obstacles.get(id) {
            Some(obstacle) => {
                obstacle_hits_player(self.geometry.as_ref(), self.player.posture(), obstacle)
            }
            None => {
                self.scheduler.cancel(timer);
                return;
            }
        };
        if hit {
            debug!("Obstacle {:?} hit the player", id);
            self.game_over();
            return;
        }

        let speed = self.config.difficulty.speed_at(self.session.score);
        let field_width = self.geometry.field_width();
        if let MoveOutcome::Exited(obstacle) =
            self.obstacles
                .advance(id, speed, field_width, &mut self.scheduler)
        {
            self.presenter.obstacle_removed(&obstacle);
        }
    }

    /// Current state as seen by a controller.
    pub fn snapshot_draft(&self) -> SnapshotDraft {
        let field = self.geometry.field();
        let player = self
            .geometry
            .player_hitbox(self.player.posture())
            .offsets_within(&field);
        let obstacles = self
            .obstacles
            .iter()
            .map(|obstacle| {
                let offsets = self
                    .geometry
                    .obstacle_hitbox(obstacle.kind, obstacle.position)
                    .offsets_within(&field);
                ObstacleReport {
                    right: offsets.right,
                    bottom: offsets.bottom,
                    kind: obstacle.kind,
                }
            })
            .collect();
        SnapshotDraft {
            player_position: Some(player),
            obstacles: Some(obstacles),
            score: self.session.score,
        }
    }

    /// Sends the current snapshot. Returns true if it went out.
    pub fn broadcast_snapshot(&mut self) -> bool {
        let draft = self.snapshot_draft();
        self.sync.send_snapshot(draft)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> GameSession {
        self.session
    }

    pub fn score(&self) -> u64 {
        self.session.score
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn posture(&self) -> Posture {
        self.player.posture()
    }

    pub fn obstacles(&self) -> &ObstacleManager {
        &self.obstacles
    }

    pub fn scheduler(&self) -> &Scheduler<Tick> {
        &self.scheduler
    }

    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn geometry(&self) -> &dyn Geometry {
        self.geometry.as_ref()
    }

    pub fn sync(&self) -> &SyncEndpoint<T> {
        &self.sync
    }

    pub fn sync_mut(&mut self) -> &mut SyncEndpoint<T> {
        &mut self.sync
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}
