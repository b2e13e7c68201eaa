//! Search functions.

mod negamax;

pub use negamax::*;

use std::fmt::{self, Display};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::coretypes::{Color, Move, PlyKind, Score};
use crate::error::{self, Error};
use crate::evaluation::EvalParams;
use crate::movelist;
use crate::state::GameState;

/// Default search depth in plies.
pub const DEPTH: PlyKind = 2;
/// Deepest search that still answers quickly enough for interactive play.
pub const RECOMMENDED_MAX_DEPTH: PlyKind = 4;

/// Parameters of one search. Built with consuming setters from `new` or `default`.
///
/// Default values:
///
/// * `depth`: [`DEPTH`]
/// * `perspective`: White
/// * `seed`: None, root moves are shuffled with entropy from the thread rng
/// * `cutoffs`: true
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SearchConfig {
    depth: PlyKind,
    perspective: Color,
    seed: Option<u64>,
    cutoffs: bool,
}

impl SearchConfig {
    /// Create a config searching `depth` plies. Depth 0 has no best move and is rejected.
    pub fn new(depth: PlyKind) -> error::Result<Self> {
        if depth == 0 {
            return Err(Error::InvalidDepth(depth));
        }
        if depth > RECOMMENDED_MAX_DEPTH {
            warn!("search depth {depth} is above the recommended {RECOMMENDED_MAX_DEPTH} plies");
        }
        Ok(Self {
            depth,
            perspective: Color::White,
            seed: None,
            cutoffs: true,
        })
    }

    /// Set the color whose advantage the evaluator scores as positive.
    pub fn perspective(mut self, perspective: Color) -> Self {
        self.perspective = perspective;
        self
    }

    /// Seed the root move shuffle, making tie-breaks reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable alpha-beta cutoffs.
    pub fn cutoffs(mut self, cutoffs: bool) -> Self {
        self.cutoffs = cutoffs;
        self
    }

    pub fn depth(&self) -> PlyKind {
        self.depth
    }

    pub fn get_perspective(&self) -> Color {
        self.perspective
    }

    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn cutoffs_enabled(&self) -> bool {
        self.cutoffs
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEPTH,
            perspective: Color::White,
            seed: None,
            cutoffs: true,
        }
    }
}

/// The results found from running a search on some root position.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SearchResult {
    /// The best move to make for a position discovered from search. None only if the root had no moves.
    pub best_move: Option<Move>,
    /// Score of making the best move, relative to the root player.
    pub score: Score,
    /// The player to move for the root position that was searched.
    pub player: Color,
    /// Depth in plies that was searched.
    pub depth: PlyKind,
    /// Total number of nodes visited in a search, root included.
    pub nodes: u64,
    /// Number of nodes scored by the evaluator.
    pub evaluations: u64,
    /// Number of nodes where remaining siblings were pruned.
    pub cutoffs: u64,
    /// Total time elapsed from the start to the end of a search.
    pub elapsed: Duration,
}

impl SearchResult {
    /// Converts the score of the search into one that is relative to search's root player.
    pub fn relative_score(&self) -> Score {
        self.score
    }

    /// Converts the score of the search into one that is absolute, with White as + and Black as -.
    pub fn absolute_score(&self) -> Score {
        self.score * self.player.sign()
    }

    /// Returns the color who is leading in the search of the root position, or None if drawn.
    pub fn leading(&self) -> Option<Color> {
        match self.absolute_score().signum() {
            1 => Some(Color::White),
            -1 => Some(Color::Black),
            _ => None,
        }
    }

    /// Get average nodes per second of search, or 0 if no time was measured.
    pub fn nps(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            (self.nodes as f64 / seconds).round()
        } else {
            0.0
        }
    }
}

impl Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let best_move = self
            .best_move
            .map_or_else(|| "none".to_string(), |best_move| best_move.to_string());

        let mut displayed = String::new();
        displayed.push_str("SearchResult {\n");
        displayed.push_str(&format!("    best_move  : {best_move}\n"));
        displayed.push_str(&format!("    abs_score  : {}\n", self.absolute_score()));
        displayed.push_str(&format!("    player     : {}\n", self.player));
        displayed.push_str(&format!("    depth      : {}\n", self.depth));
        displayed.push_str(&format!("    nodes      : {}\n", self.nodes));
        displayed.push_str(&format!("    evaluations: {}\n", self.evaluations));
        displayed.push_str(&format!("    cutoffs    : {}\n", self.cutoffs));
        displayed.push_str(&format!(
            "    elapsed    : {}.{:03}s\n",
            self.elapsed.as_secs(),
            self.elapsed.subsec_millis()
        ));
        displayed.push_str(&format!("    nps        : {}\n", self.nps()));
        displayed.push_str("}\n");

        write!(f, "{displayed}")
    }
}

/// Negamove primary position search function.
///
/// `legal_moves` must be exactly the legal moves of `state`. They are shuffled before
/// the search, so among equally scored moves the one returned varies unless seeded.
/// `state` is restored to its original value before returning.
pub fn search<G: GameState + ?Sized>(
    state: &mut G,
    legal_moves: &[Move],
    config: &SearchConfig,
) -> SearchResult {
    let start_time = Instant::now();
    let player = state.side_to_move();
    info!(
        "search start: depth {}, {} root moves, {player} to move",
        config.depth,
        legal_moves.len()
    );

    let mut root_moves = legal_moves.to_vec();
    match config.seed {
        Some(seed) => root_moves.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => root_moves.shuffle(&mut rand::thread_rng()),
    }
    debug!("root order: {}", movelist::display(&root_moves));

    let params = EvalParams::for_state(state, config.perspective);
    let mut negamax = Negamax::new(config.depth, params).with_cutoffs(config.cutoffs);
    let score = negamax.run(state, &root_moves);

    let result = SearchResult {
        best_move: negamax.best_move(),
        score,
        player,
        depth: config.depth,
        nodes: negamax.nodes(),
        evaluations: negamax.evaluations(),
        cutoffs: negamax.cutoffs(),
        elapsed: start_time.elapsed(),
    };
    info!(
        "search done: best move {}, score {}, {} nodes, {} cutoffs in {:?} ({} nps)",
        result
            .best_move
            .map_or_else(|| "none".to_string(), |best_move| best_move.to_string()),
        result.absolute_score(),
        result.nodes,
        result.cutoffs,
        result.elapsed,
        result.nps()
    );
    result
}

/// Search `state` to `depth` and send the best move over `sender` exactly once.
/// None is sent only if `legal_moves` is empty.
///
/// Fails without sending if `depth` is 0, or if the receiving side has hung up.
pub fn find_best_move<G: GameState + ?Sized>(
    state: &mut G,
    legal_moves: &[Move],
    sender: &Sender<Option<Move>>,
    depth: PlyKind,
) -> error::Result<()> {
    let config = SearchConfig::new(depth)?;
    let result = search(state, legal_moves, &config);

    sender.send(result.best_move).map_err(|_| {
        warn!("best move receiver is gone, dropping {:?}", result.best_move);
        Error::ResultChannelClosed
    })
}

/// Negamove non-blocking search function. This runs the search on a separate thread,
/// which owns `state` until it finishes. When the search has been completed,
/// it returns the value by sending it over the given Sender.
pub fn search_nonblocking<G, T>(
    mut state: G,
    config: SearchConfig,
    sender: Sender<T>,
) -> thread::JoinHandle<()>
where
    G: 'static + GameState + Send,
    T: 'static + Send + From<SearchResult>,
{
    thread::spawn(move || {
        let legal_moves = state.legal_moves();
        let search_result = search(&mut state, &legal_moves, &config);
        if sender.send(search_result.into()).is_err() {
            warn!("search result receiver is gone");
        }
    })
}

/// Pick a uniformly random move, or None if there are none.
pub fn random_move<R: Rng + ?Sized>(legal_moves: &[Move], rng: &mut R) -> Option<Move> {
    legal_moves.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::Square::*;
    use crate::evaluation::CHECKMATE;
    use crate::fen::Fen;
    use crate::Position;
    use std::sync::mpsc;

    #[test]
    fn config_rejects_depth_zero() {
        assert_eq!(SearchConfig::new(0), Err(Error::InvalidDepth(0)));
        let config = SearchConfig::new(3).unwrap().perspective(Color::Black).seed(7);
        assert_eq!(config.depth(), 3);
        assert_eq!(config.get_perspective(), Color::Black);
        assert_eq!(config.get_seed(), Some(7));
        assert!(config.cutoffs_enabled());
        assert_eq!(SearchConfig::default().depth(), DEPTH);
    }

    #[test]
    fn absolute_score_and_leading() {
        let mut position = Position::parse_fen("r5k1/8/8/8/8/8/5PPP/6K1 b - - 0 1").unwrap();
        let moves = position.legal_moves();
        let result = search(&mut position, &moves, &SearchConfig::new(2).unwrap().seed(1));

        assert_eq!(result.best_move, Some(Move::new(A8, A1, None)));
        assert_eq!(result.relative_score(), CHECKMATE);
        assert_eq!(result.absolute_score(), -CHECKMATE);
        assert_eq!(result.leading(), Some(Color::Black));
        assert_eq!(result.player, Color::Black);
        assert!(result.to_string().contains("a8a1"));
    }

    #[test]
    fn nps_without_elapsed_time() {
        let mut position = Position::start_position();
        let moves = position.legal_moves();
        let mut result = search(&mut position, &moves, &SearchConfig::new(1).unwrap());
        assert_eq!(result.nodes, 21);

        result.elapsed = Duration::ZERO;
        assert_eq!(result.nps(), 0.0);
        result.elapsed = Duration::from_millis(500);
        assert_eq!(result.nps(), 42.0);
    }

    #[test]
    fn find_best_move_sends_once() {
        let (sender, receiver) = mpsc::channel();
        let mut position = Position::parse_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let moves = position.legal_moves();

        find_best_move(&mut position, &moves, &sender, 1).unwrap();
        assert_eq!(receiver.try_recv(), Ok(Some(Move::new(A1, A8, None))));
        assert!(receiver.try_recv().is_err());

        let mut mated = Position::parse_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").unwrap();
        let no_moves = mated.legal_moves();
        find_best_move(&mut mated, &no_moves, &sender, DEPTH).unwrap();
        assert_eq!(receiver.try_recv(), Ok(None));
    }

    #[test]
    fn find_best_move_errors() {
        let (sender, receiver) = mpsc::channel();
        let mut position = Position::start_position();
        let moves = position.legal_moves();
        assert_eq!(
            find_best_move(&mut position, &moves, &sender, 0),
            Err(Error::InvalidDepth(0))
        );

        drop(receiver);
        assert_eq!(
            find_best_move(&mut position, &moves, &sender, 1),
            Err(Error::ResultChannelClosed)
        );
    }

    #[test]
    fn random_move_picks_legal_move() {
        let mut position = Position::start_position();
        let moves = position.legal_moves();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let chosen = random_move(&moves, &mut rng).unwrap();
            assert!(moves.contains(&chosen));
        }
        assert_eq!(random_move(&[], &mut rng), None);
    }
}
