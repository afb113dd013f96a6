//! Turn driver: one command in, one animated turn out.
//!
//! ```text
//! AwaitingInput --direction (board changed)--> Animating
//! Animating --tick (projector settled)--> spawn, game-over check --> AwaitingInput
//! any --NewGame--> AwaitingInput (in-flight animation discarded)
//! ```

use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::core::{
    AnimationPhase, BoardEngine, EngineError, MoveOp, MoveProjector, SessionSnapshot,
    SnapshotError, Sprite,
};
use crate::queue::CommandQueue;
use crate::types::{Command, Direction};

/// Where the session is within a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    AwaitingInput,
    Animating,
}

/// What a host needs to present one step of play
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub changed: bool,
    pub ops: Vec<MoveOp>,
    pub score: u32,
    pub max_score: u32,
    pub won: bool,
    pub game_over: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(TurnReport),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No turn in progress
    Idle,
    /// Sprites are still moving
    Animating,
    /// The turn came to rest; the report carries the spawned tile, if any
    Settled(TurnReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestoreOutcome {
    Restored,
    /// The snapshot was unusable and a new game was started instead
    FreshGame,
}

#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    engine: BoardEngine,
    projector: MoveProjector,
    phase: TurnPhase,
}

impl Session {
    /// Create a session with an empty board; call [`Session::new_game`] to deal
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            engine: BoardEngine::new(config.seed),
            projector: MoveProjector::new(),
            phase: TurnPhase::AwaitingInput,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn engine(&self) -> &BoardEngine {
        &self.engine
    }

    pub fn projector(&self) -> &MoveProjector {
        &self.projector
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase == TurnPhase::Animating
    }

    /// Sprites of the current animation frame
    pub fn sprites(&self) -> &[Sprite] {
        self.projector.sprites()
    }

    fn report(&self, changed: bool, ops: Vec<MoveOp>) -> TurnReport {
        TurnReport {
            changed,
            ops,
            score: self.engine.score(),
            max_score: self.engine.max_score(),
            won: self.engine.won(),
            game_over: self.engine.is_game_over(),
        }
    }

    /// Spawn into both the engine and the projector
    fn spawn(&mut self) -> Result<Option<MoveOp>, EngineError> {
        match self.engine.spawn_random_tile() {
            Some(tile) => Ok(Some(self.projector.spawn(tile.value, tile.at)?)),
            None => Ok(None),
        }
    }

    /// Start a new game: empty board, score 0, two random tiles.
    ///
    /// Any animation in flight is discarded along with the old board.
    pub fn new_game(&mut self) -> Result<TurnReport, EngineError> {
        self.engine.new_game();
        self.projector.reset();
        self.phase = TurnPhase::AwaitingInput;

        let mut ops = Vec::with_capacity(2);
        for _ in 0..2 {
            ops.extend(self.spawn()?);
        }
        info!(max_score = self.engine.max_score(), "new game");
        Ok(self.report(true, ops))
    }

    /// Apply one command
    pub fn handle(&mut self, command: Command) -> Result<Flow, EngineError> {
        match command {
            Command::Quit => {
                info!(score = self.engine.score(), "quit");
                Ok(Flow::Quit)
            }
            Command::NewGame => Ok(Flow::Continue(self.new_game()?)),
            Command::North => self.tilt(Direction::North),
            Command::East => self.tilt(Direction::East),
            Command::South => self.tilt(Direction::South),
            Command::West => self.tilt(Direction::West),
        }
    }

    fn tilt(&mut self, direction: Direction) -> Result<Flow, EngineError> {
        if self.is_animating() {
            return Err(EngineError::AnimationInFlight);
        }
        if self.engine.ended() || self.engine.is_game_over() {
            debug!(direction = direction.as_str(), "ignoring tilt after game over");
            return Ok(Flow::Continue(self.report(false, Vec::new())));
        }

        let result = self.engine.tilt(direction, true);
        if !result.changed {
            debug!(direction = direction.as_str(), "tilt changed nothing");
            return Ok(Flow::Continue(self.report(false, Vec::new())));
        }

        let record = self.projector.record(&result.events)?;
        let ops = self.projector.project(record);
        self.phase = TurnPhase::Animating;
        Ok(Flow::Continue(self.report(true, ops)))
    }

    /// Advance the animation by one frame
    pub fn tick(&mut self) -> Result<TickOutcome, EngineError> {
        if !self.is_animating() {
            return Ok(TickOutcome::Idle);
        }
        match self.projector.tick() {
            AnimationPhase::Animating => Ok(TickOutcome::Animating),
            AnimationPhase::Settled | AnimationPhase::Idle => {
                self.phase = TurnPhase::AwaitingInput;
                let ops: Vec<MoveOp> = self.spawn()?.into_iter().collect();
                if self.engine.is_game_over() {
                    self.engine.end_game();
                    info!(
                        score = self.engine.score(),
                        won = self.engine.won(),
                        "game over"
                    );
                }
                Ok(TickOutcome::Settled(self.report(true, ops)))
            }
        }
    }

    /// Tick until the current turn settles; `None` if nothing was animating
    pub fn settle(&mut self) -> Result<Option<TurnReport>, EngineError> {
        loop {
            match self.tick()? {
                TickOutcome::Idle => return Ok(None),
                TickOutcome::Animating => {}
                TickOutcome::Settled(report) => return Ok(Some(report)),
            }
        }
    }

    /// Take at most one command from `queue` and apply it.
    ///
    /// While a turn is animating only `NewGame` and `Quit` are taken.
    pub fn pump(&mut self, queue: &mut CommandQueue) -> Result<Option<Flow>, EngineError> {
        match queue.next(self.is_animating()) {
            Some(command) => self.handle(command).map(Some),
            None => Ok(None),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            score: self.engine.score(),
            tiles: self.engine.tiles(),
        }
    }

    pub fn snapshot_json(&self) -> Result<String, SnapshotError> {
        self.snapshot().to_json()
    }

    /// Restore a saved game; `max_score` is kept by the host.
    ///
    /// A malformed payload or invalid tile list starts a fresh game instead.
    pub fn restore(&mut self, json: &str, max_score: u32) -> Result<RestoreOutcome, EngineError> {
        match self.load_snapshot(json, max_score) {
            Ok(()) => Ok(RestoreOutcome::Restored),
            Err(err) => {
                warn!(error = %err, "unusable snapshot, starting a new game");
                self.engine.set_score(0, max_score);
                self.new_game()?;
                Ok(RestoreOutcome::FreshGame)
            }
        }
    }

    fn load_snapshot(&mut self, json: &str, max_score: u32) -> Result<(), SnapshotError> {
        let snapshot = SessionSnapshot::from_json(json)?;
        self.engine.new_game();
        self.engine.load_tiles(&snapshot.tiles)?;
        self.projector.load(&snapshot.tiles)?;
        self.engine.set_score(snapshot.score, max_score);
        self.phase = TurnPhase::AwaitingInput;

        if self.engine.is_game_over() {
            self.engine.end_game();
        }
        debug!(
            score = snapshot.score,
            tiles = snapshot.tiles.len(),
            "restored snapshot"
        );
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
