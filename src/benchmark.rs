use std::time::{Duration, Instant};

use tracing::debug;

use crate::{SearchError, SinglePlayerGame};

/// Aggregated outcome of running one strategy over a range of seeds, see [`benchmark_strategy`].
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    /// Label of the benchmarked strategy, handed through for reporting.
    pub label: String,
    /// Mean final evaluated score over all seeds.
    pub mean_score: f64,
    /// Mean wall time of a single strategy invocation.
    pub mean_time: Duration,
}

/// Runs `strategy` against freshly constructed states for the seeds `0..num_seeds` and reports the
/// mean final score together with the mean wall time of one invocation.
///
/// Each seed is run `samples_per_seed` times to stabilize the time measurement. The action
/// sequence returned by the first run is the one played out for scoring; strategies are expected
/// to be deterministic for a fixed state, further samples only feed the clock.
pub fn benchmark_strategy<G, N, S>(
    label: &str,
    mut new_state: N,
    mut strategy: S,
    num_seeds: u64,
    samples_per_seed: u32,
) -> Result<BenchmarkReport, SearchError>
where
    G: SinglePlayerGame,
    N: FnMut(u64) -> G,
    S: FnMut(&G) -> Result<Vec<G::Action>, SearchError>,
{
    assert!(num_seeds >= 1, "need at least one seed");
    assert!(samples_per_seed >= 1, "need at least one sample per seed");

    let mut score_sum = 0.0;
    let mut elapsed = Duration::ZERO;
    for seed in 0..num_seeds {
        let state = new_state(seed);
        let mut first_actions = None;
        let start = Instant::now();
        for _ in 0..samples_per_seed {
            let actions = strategy(&state)?;
            first_actions.get_or_insert(actions);
        }
        elapsed += start.elapsed();
        let actions = first_actions.expect("at least one sample ran");
        let score = final_score(state, &actions);
        debug!(label, seed, score, "benchmarked seed");
        score_sum += score;
    }
    let total_runs = (num_seeds * u64::from(samples_per_seed)) as u32;
    Ok(BenchmarkReport {
        label: label.to_owned(),
        mean_score: score_sum / num_seeds as f64,
        mean_time: elapsed / total_runs,
    })
}

/// Plays two strategies on the seeds `0, 1, ..` and returns the smallest seed on which their final
/// evaluated scores differ, or `None` if they agree on all `num_seeds` seeds. Useful to pin down a
/// concrete game there two supposedly equivalent strategies disagree.
pub fn find_divergence<G, N, A, B>(
    mut new_state: N,
    mut strategy_a: A,
    mut strategy_b: B,
    num_seeds: u64,
) -> Result<Option<u64>, SearchError>
where
    G: SinglePlayerGame,
    N: FnMut(u64) -> G,
    A: FnMut(&G) -> Result<Vec<G::Action>, SearchError>,
    B: FnMut(&G) -> Result<Vec<G::Action>, SearchError>,
{
    for seed in 0..num_seeds {
        let state = new_state(seed);
        let score_a = final_score(state.clone(), &strategy_a(&state)?);
        let score_b = final_score(state.clone(), &strategy_b(&state)?);
        if score_a != score_b {
            debug!(seed, score_a, score_b, "strategies diverged");
            return Ok(Some(seed));
        }
    }
    Ok(None)
}

/// Replay the action sequence on the state and evaluate whatever it reaches.
fn final_score<G>(mut state: G, actions: &[G::Action]) -> f64
where
    G: SinglePlayerGame,
{
    for &action in actions {
        state.advance(action);
    }
    state.evaluate_score()
}
