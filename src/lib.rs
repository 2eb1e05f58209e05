mod beam;
mod benchmark;
mod error;
mod parallel;
mod simulation;
mod single_player_game;
mod tree;

pub use self::{
    beam::{beam_search_action, beam_search_action_by_partial},
    benchmark::{benchmark_strategy, find_divergence, BenchmarkReport},
    error::SearchError,
    parallel::beam_search_action_mp,
    simulation::random_action,
    single_player_game::SinglePlayerGame,
    tree::{Node, Tree, ROOT_INDEX},
};
