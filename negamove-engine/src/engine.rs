//! Engine struct acts as a simplified API for playing a game against the Negamove search.

use std::sync::mpsc::{self, Receiver};
use std::thread::JoinHandle;

use log::warn;

use crate::coretypes::{Color, Move, MoveInfo, PlyKind};
use crate::error::{self, Error};
use crate::position::Position;
use crate::search::{self, SearchConfig, SearchResult, DEPTH};

/// EngineBuilder allows for parameters of an Engine to be set and built once.
///
/// Default values:
///
/// * `position`: Starting chess position
/// * `depth`: [`DEPTH`]
/// * `seed`: None
/// * `perspective`: White
/// * `plays_as_black`: false
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EngineBuilder {
    position: Position,
    depth: PlyKind,
    seed: Option<u64>,
    perspective: Color,
    plays_as_black: bool,
}

impl EngineBuilder {
    /// Create a new default EngineBuilder.
    pub fn new() -> Self {
        Self {
            position: Position::start_position(),
            depth: DEPTH,
            seed: None,
            perspective: Color::White,
            plays_as_black: false,
        }
    }

    /// Create and return a new Engine. Fails if the configured depth is invalid.
    pub fn build(&self) -> error::Result<Engine> {
        let mut config = SearchConfig::new(self.depth)?.perspective(self.perspective);
        if let Some(seed) = self.seed {
            config = config.seed(seed);
        }

        let mut position = self.position.clone();
        position.set_plays_as_black(self.plays_as_black);
        position.legal_moves();

        Ok(Engine {
            position,
            config,
            search_handle: None,
        })
    }

    /// Set the Engine's initial position.
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Set the depth in plies of every search.
    pub fn depth(mut self, depth: PlyKind) -> Self {
        self.depth = depth;
        self
    }

    /// Seed the root move shuffle of every search.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the color the evaluator scores as positive.
    pub fn perspective(mut self, perspective: Color) -> Self {
        self.perspective = perspective;
        self
    }

    /// Set whether the human player plays Black.
    pub fn plays_as_black(mut self, plays_as_black: bool) -> Self {
        self.plays_as_black = plays_as_black;
        self
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine holds the game being played and runs searches on it.
///
/// Only one search runs at a time. Each search works on its own copy of the
/// current position, moved into a worker thread, so the game can be read while it runs.
#[derive(Debug)]
pub struct Engine {
    position: Position,
    config: SearchConfig,
    search_handle: Option<JoinHandle<()>>,
}

impl Engine {
    /// Engine on the start position with default search parameters.
    pub fn new() -> Self {
        let mut position = Position::start_position();
        position.legal_moves();
        Self {
            position,
            config: SearchConfig::default(),
            search_handle: None,
        }
    }

    /// Returns reference to current position of engine.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the parameters used by every search.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Set the position for evaluation, which must have no search running on it.
    pub fn set_position(&mut self, mut position: Position) {
        position.legal_moves();
        self.position = position;
    }

    /// Apply a move to the current game if it is legal.
    pub fn do_move(&mut self, move_: Move) -> error::Result<MoveInfo> {
        self.position.do_legal_move(move_)
    }

    /// Take back the most recent move of the current game.
    pub fn take_back(&mut self) -> error::Result<MoveInfo> {
        let move_info = self.position.take_back()?;
        self.position.legal_moves();
        Ok(move_info)
    }

    /// Run a non-blocking search on the current position.
    /// The engine only runs one search at a time, so if it is not ready, it fails to begin.
    /// The result is received from the returned Receiver.
    pub fn search(&mut self) -> error::Result<Receiver<SearchResult>> {
        if !self.ready() {
            return Err(Error::EngineAlreadySearching);
        }
        self.wait();

        let (sender, receiver) = mpsc::channel();
        let handle = search::search_nonblocking(self.position.clone(), self.config, sender);
        self.search_handle = Some(handle);
        Ok(receiver)
    }

    /// Run a blocking search.
    pub fn search_sync(&mut self) -> error::Result<SearchResult> {
        let receiver = self.search()?;
        let result = receiver.recv().map_err(|_| Error::ResultChannelClosed);
        self.wait();
        result
    }

    /// Engine blocks thread until search is completed.
    pub fn wait(&mut self) {
        if let Some(handle) = self.search_handle.take() {
            if handle.join().is_err() {
                warn!("search worker panicked");
            }
        }
    }

    /// Returns true if the engine is ready to start a search.
    /// Only one search may run at a time, so if a search is in progress, engine is not ready.
    pub fn ready(&self) -> bool {
        self.search_handle
            .as_ref()
            .map_or(true, JoinHandle::is_finished)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::Square::*;
    use crate::evaluation::CHECKMATE;
    use crate::fen::Fen;

    #[test]
    fn builder_rejects_depth_zero() {
        assert!(matches!(
            EngineBuilder::new().depth(0).build(),
            Err(Error::InvalidDepth(0))
        ));
    }

    #[test]
    fn builder_sets_player_color() {
        let engine = EngineBuilder::new().plays_as_black(true).build().unwrap();
        assert!(engine.position().plays_as_black());
        assert!(!Engine::new().position().plays_as_black());
    }

    #[test]
    fn search_sync_finds_mate() {
        let position = Position::parse_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mut engine = EngineBuilder::new()
            .position(position.clone())
            .depth(2)
            .seed(3)
            .build()
            .unwrap();

        let result = engine.search_sync().unwrap();
        assert_eq!(result.best_move, Some(Move::new(A1, A8, None)));
        assert_eq!(result.relative_score(), CHECKMATE);
        assert_eq!(engine.position().to_fen(), position.to_fen());
        assert!(engine.ready());
    }

    #[test]
    fn one_search_at_a_time() {
        let mut engine = EngineBuilder::new().depth(3).build().unwrap();
        let receiver = engine.search().unwrap();
        let second = engine.search();
        // The first search may already be done on a fast machine.
        if let Err(err) = second {
            assert_eq!(err, Error::EngineAlreadySearching);
            let result = receiver.recv().unwrap();
            assert!(result.best_move.is_some());
        }
        engine.wait();
        assert!(engine.ready());
    }

    #[test]
    fn moves_and_take_backs() {
        let mut engine = Engine::new();
        assert!(engine.do_move(Move::new(E2, E4, None)).is_ok());
        assert_eq!(
            engine.do_move(Move::new(E2, E4, None)),
            Err(Error::IllegalMove(Move::new(E2, E4, None)))
        );
        assert!(engine.take_back().is_ok());
        assert_eq!(engine.take_back(), Err(Error::NoMoveToUndo));
        assert_eq!(engine.position().to_fen(), Position::start_position().to_fen());
    }
}
