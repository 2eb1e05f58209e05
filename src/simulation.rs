use rand::{seq::IndexedRandom as _, Rng};

use crate::{tree::ROOT_INDEX, SinglePlayerGame, Tree};

/// Play uniform random legal actions, starting from `root`, until the game is done, dead or out of
/// legal actions. Returns the action sequence leading from the root to the reached state.
///
/// Callers supply the generator, which makes the walk reproducible for a fixed seed and allows
/// each thread of a concurrent host to own its generator. Must not be shared: two walks
/// interleaving draws from one generator would not reproduce.
pub fn random_action<G>(root: G, rng: &mut impl Rng) -> Vec<G::Action>
where
    G: SinglePlayerGame,
{
    let mut tree = Tree::new(root);
    let mut current = ROOT_INDEX;
    let mut actions_buf = Vec::new();
    loop {
        let state = tree.state(current);
        if state.is_done() || state.is_dead() {
            break;
        }
        state.legal_actions(&mut actions_buf);
        // A state which offers no continuation is treated like a terminal one.
        let Some(&action) = actions_buf.choose(rng) else {
            break;
        };
        let child = tree.clone_advanced(current, action);
        current = tree.insert(child);
    }
    tree.extract_actions(current)
}
