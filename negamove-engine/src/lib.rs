//! Negamove engine: fixed-depth negamax chess move search with alpha-beta pruning,
//! and the chess rules engine it searches.

pub mod coretypes;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod fen;
pub mod mailbox;
pub(crate) mod movegen;
pub mod movelist;
pub mod perft;
pub mod position;
pub mod search;
pub mod state;
pub mod tables;

pub use engine::{Engine, EngineBuilder};
pub use evaluation::{evaluate, EvalParams, CHECKMATE, STALEMATE};
pub use position::Position;
pub use search::{find_best_move, SearchConfig, SearchResult, DEPTH};
pub use state::{GameState, Orientation};
