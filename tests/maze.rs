use beam_tree_search::{
    beam_search_action, beam_search_action_by_partial, beam_search_action_mp, benchmark_strategy,
    find_divergence, random_action, SearchError, SinglePlayerGame,
};
use rand::{rngs::StdRng, Rng as _, SeedableRng as _};

#[test]
fn random_walk_plays_legal_actions_until_the_turn_limit() {
    let mut rng = StdRng::seed_from_u64(0);

    let actions = random_action(MazeState::fixed(), &mut rng);

    assert_eq!(4, actions.len());
    let end = replay(MazeState::fixed(), &actions);
    assert!(end.is_done());
}

#[test]
fn random_walk_stops_at_traps() {
    let mut rng = StdRng::seed_from_u64(5);
    let maze = MazeState::fixed().with_trap(1, 1);

    let actions = random_action(maze.clone(), &mut rng);

    let end = replay(maze, &actions);
    assert!(end.is_done() || end.is_dead());
}

#[test]
fn equal_seeds_reproduce_the_walk() {
    let mut first_rng = StdRng::seed_from_u64(0);
    let mut second_rng = StdRng::seed_from_u64(0);

    let first = random_action(MazeState::fixed(), &mut first_rng);
    let second = random_action(MazeState::fixed(), &mut second_rng);

    assert_eq!(first, second);
}

/// A beam of width one keeps only the best scoring child of each round, so it commits to the
/// points right next to the start and misses the better haul on the top row.
#[test]
fn narrow_beam_commits_to_the_locally_best_pickups() {
    let actions = beam_search_action(MazeState::fixed(), 1).unwrap();

    assert_eq!(vec![2, 0, 2, 0], actions);
    let end = replay(MazeState::fixed(), &actions);
    assert!(end.is_done());
    assert_eq!(9, end.game_score);
}

/// On a grid there the greedy choice is unique at every turn, width one follows it exactly. The
/// cumulative scores along the expected path are 1, 3, 7 and finally 14.
#[test]
fn narrow_beam_follows_the_best_immediate_score() {
    let maze = MazeState::with_points([[0, 1, 2, 0], [0, 0, 4, 7], [0, 6, 0, 0]], 4);

    let actions = beam_search_action(maze.clone(), 1).unwrap();

    assert_eq!(vec![0, 0, 2, 0], actions);
    assert_eq!(14, replay(maze, &actions).game_score);
}

#[test]
fn wider_beams_reach_at_least_the_narrow_beam_score() {
    let narrow = beam_search_action(MazeState::fixed(), 1).unwrap();
    let wide = beam_search_action(MazeState::fixed(), 4).unwrap();

    let narrow_score = replay(MazeState::fixed(), &narrow).game_score;
    let wide_score = replay(MazeState::fixed(), &wide).game_score;
    assert!(wide_score >= narrow_score);
    assert_eq!(12, wide_score);
}

#[test]
fn narrow_beam_routes_around_a_trap() {
    let maze = MazeState::fixed().with_trap(1, 1);

    let actions = beam_search_action(maze.clone(), 1).unwrap();

    assert_eq!(vec![2, 2, 0, 0], actions);
    let end = replay(maze, &actions);
    assert!(end.is_done());
    assert!(!end.is_dead());
    assert_eq!(9, end.game_score);
}

/// If every continuation from the root steps into a trap, the drivers must report the condition
/// rather than return an empty sequence a caller could mistake for "play nothing".
#[test]
fn trapped_root_reports_no_feasible_path() {
    let maze = MazeState::fixed().with_trap(0, 1).with_trap(1, 0);

    assert_eq!(
        Err(SearchError::NoFeasiblePath),
        beam_search_action(maze.clone(), 1)
    );
    assert_eq!(
        Err(SearchError::NoFeasiblePath),
        beam_search_action_by_partial(maze.clone(), 4)
    );
    assert_eq!(
        Err(SearchError::NoFeasiblePath),
        beam_search_action_mp(maze, 4, 2)
    );
}

#[test]
fn partial_selection_finds_the_best_reachable_score_on_the_fixed_maze() {
    let actions = beam_search_action_by_partial(MazeState::fixed(), 25).unwrap();

    let end = replay(MazeState::fixed(), &actions);
    assert!(end.is_done());
    assert_eq!(12, end.game_score);
}

#[test]
fn parallel_driver_finds_the_best_reachable_score_on_the_fixed_maze() {
    let actions = beam_search_action_mp(MazeState::fixed(), 25, 3).unwrap();

    let end = replay(MazeState::fixed(), &actions);
    assert!(end.is_done());
    assert_eq!(12, end.game_score);
}

/// Both sequential drivers retain the same candidates under a score whose order is salted by the
/// remaining turns, so their final scores agree on every seed.
#[test]
fn partial_selection_matches_the_canonical_driver_scores() {
    for seed in 0..100 {
        let maze = MazeState::random(seed, 3).salted();

        let canonical = beam_search_action(maze.clone(), 25).unwrap();
        let partial = beam_search_action_by_partial(maze.clone(), 25).unwrap();

        let mut canonical_end = replay(maze.clone(), &canonical);
        let mut partial_end = replay(maze, &partial);
        assert_eq!(
            canonical_end.evaluate_score(),
            partial_end.evaluate_score(),
            "seed {seed}"
        );
    }
}

#[test]
fn parallel_driver_matches_the_sequential_scores() {
    for seed in 0..20 {
        let maze = MazeState::random(seed, 3).salted();

        let sequential = beam_search_action(maze.clone(), 25).unwrap();
        let parallel = beam_search_action_mp(maze.clone(), 25, 4).unwrap();

        let mut sequential_end = replay(maze.clone(), &sequential);
        let mut parallel_end = replay(maze, &parallel);
        assert_eq!(
            sequential_end.evaluate_score(),
            parallel_end.evaluate_score(),
            "seed {seed}"
        );
    }
}

#[test]
fn sequential_drivers_are_deterministic() {
    let first = beam_search_action(MazeState::random(7, 4), 8).unwrap();
    let second = beam_search_action(MazeState::random(7, 4), 8).unwrap();

    assert_eq!(first, second);
}

#[test]
fn benchmark_reports_mean_score_and_label() {
    let report = benchmark_strategy(
        "beam width 4",
        |_seed| MazeState::fixed(),
        |maze| beam_search_action(maze.clone(), 4),
        3,
        2,
    )
    .unwrap();

    assert_eq!("beam width 4", report.label);
    assert_eq!(12.0, report.mean_score);
}

#[test]
fn divergence_finder_reports_the_first_differing_seed() {
    // Width one commits to the nearby points and scores 9 on the fixed maze, width four finds 12,
    // so the two strategies already differ on the first seed.
    let diverged = find_divergence(
        |_seed| MazeState::fixed(),
        |maze| beam_search_action(maze.clone(), 1),
        |maze| beam_search_action(maze.clone(), 4),
        10,
    )
    .unwrap();
    assert_eq!(Some(0), diverged);

    let agreed = find_divergence(
        |_seed| MazeState::fixed(),
        |maze| beam_search_action(maze.clone(), 4),
        |maze| beam_search_action(maze.clone(), 4),
        10,
    )
    .unwrap();
    assert_eq!(None, agreed);
}

const HEIGHT: usize = 3;
const WIDTH: usize = 4;

/// Movement deltas for the actions 0 = right, 1 = left, 2 = down, 3 = up.
const DX: [i32; 4] = [1, -1, 0, 0];
const DY: [i32; 4] = [0, 0, 1, -1];

/// A character walks a small grid for a fixed number of turns, collecting the points placed on the
/// cells it visits. Stepping onto a trap disqualifies the run.
#[derive(Clone)]
struct MazeState {
    points: [[u32; WIDTH]; HEIGHT],
    traps: [[bool; WIDTH]; HEIGHT],
    y: usize,
    x: usize,
    turn: u32,
    end_turn: u32,
    game_score: u32,
    /// Salt the evaluated score with the remaining turns, see [`MazeState::salted`].
    salted_score: bool,
}

impl MazeState {
    /// The example grid used throughout the tests: character in the top left corner, four turns,
    /// richest pickups on the bottom and right.
    fn fixed() -> Self {
        Self::with_points([[0, 1, 2, 0], [3, 0, 4, 5], [0, 6, 0, 7]], 4)
    }

    fn with_points(points: [[u32; WIDTH]; HEIGHT], end_turn: u32) -> Self {
        MazeState {
            points,
            traps: [[false; WIDTH]; HEIGHT],
            y: 0,
            x: 0,
            turn: 0,
            end_turn,
            game_score: 0,
            salted_score: false,
        }
    }

    /// A maze generated from a seed: random character position and random points on every other
    /// cell, like a fresh round of the game.
    fn random(seed: u64, end_turn: u32) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let y = rng.random_range(0..HEIGHT);
        let x = rng.random_range(0..WIDTH);
        let mut points = [[0u32; WIDTH]; HEIGHT];
        for (cell_y, row) in points.iter_mut().enumerate() {
            for (cell_x, cell) in row.iter_mut().enumerate() {
                if cell_y == y && cell_x == x {
                    continue;
                }
                *cell = rng.random_range(0..10);
            }
        }
        let mut state = Self::with_points(points, end_turn);
        state.y = y;
        state.x = x;
        state
    }

    fn with_trap(mut self, y: usize, x: usize) -> Self {
        self.traps[y][x] = true;
        self
    }

    fn salted(mut self) -> Self {
        self.salted_score = true;
        self
    }
}

impl SinglePlayerGame for MazeState {
    type Action = usize;

    fn legal_actions(&self, actions_buf: &mut Vec<usize>) {
        actions_buf.clear();
        for action in 0..4 {
            let ty = self.y as i32 + DY[action];
            let tx = self.x as i32 + DX[action];
            if ty >= 0 && ty < HEIGHT as i32 && tx >= 0 && tx < WIDTH as i32 {
                actions_buf.push(action);
            }
        }
    }

    fn advance(&mut self, action: usize) {
        self.y = (self.y as i32 + DY[action]) as usize;
        self.x = (self.x as i32 + DX[action]) as usize;
        let points = &mut self.points[self.y][self.x];
        self.game_score += *points;
        *points = 0;
        self.turn += 1;
    }

    fn is_done(&self) -> bool {
        self.turn == self.end_turn
    }

    fn is_dead(&self) -> bool {
        self.traps[self.y][self.x]
    }

    fn evaluate_score(&mut self) -> f64 {
        if self.salted_score {
            f64::from(self.game_score * 1000 + (self.end_turn - self.turn))
        } else {
            f64::from(self.game_score)
        }
    }
}

/// Replays an action sequence on the state, asserting every action was legal at the moment of its
/// application and that the sequence did not continue past a done or dead state.
fn replay(mut state: MazeState, actions: &[usize]) -> MazeState {
    let mut legal = Vec::new();
    for &action in actions {
        assert!(!state.is_done());
        assert!(!state.is_dead());
        state.legal_actions(&mut legal);
        assert!(legal.contains(&action));
        state.advance(action);
    }
    state
}
