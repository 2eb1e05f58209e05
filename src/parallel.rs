use std::thread;

use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::{
    beam::select_top,
    tree::{Node, Tree, ROOT_INDEX},
    SearchError, SinglePlayerGame,
};

/// Multi threaded variant of [`crate::beam_search_action`]. The current beam is partitioned into
/// `num_workers` shards; each round every worker expands its own shard, the per worker results are
/// merged, pruned to `beam_width` and redistributed round robin.
///
/// Workers only read the shared tree and only write their own output, so the round boundary join
/// is the single synchronization point. Within one shard the expansion order matches the
/// sequential drivers, across shards it is unspecified: when scores tie, the selected path may
/// differ from the sequential drivers, while the reached score matches up to tie breaking.
pub fn beam_search_action_mp<G>(
    root: G,
    beam_width: usize,
    num_workers: usize,
) -> Result<Vec<G::Action>, SearchError>
where
    G: SinglePlayerGame + Send + Sync,
    G::Action: Send + Sync,
{
    assert!(beam_width >= 1, "beam width must be at least one");
    assert!(num_workers >= 1, "worker count must be at least one");
    if root.is_done() {
        return Ok(Vec::new());
    }
    if root.is_dead() {
        return Err(SearchError::NoFeasiblePath);
    }

    let mut tree = Tree::new(root);
    let mut shards: Vec<Vec<usize>> = vec![Vec::new(); num_workers];
    shards[0].push(ROOT_INDEX);
    let mut round = 0u32;
    loop {
        // New nodes stay detached from the tree until after the join, the workers themselves only
        // ever read it.
        let results: Vec<Vec<Node<G>>> = thread::scope(|scope| {
            let tree = &tree;
            let handles: Vec<_> = shards
                .iter()
                .map(|shard| scope.spawn(move || expand_shard(tree, shard, beam_width)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("beam worker panicked"))
                .collect()
        });
        let mut pool: Vec<Node<G>> = results.into_iter().flatten().collect();
        if pool.is_empty() {
            return Err(SearchError::NoFeasiblePath);
        }
        select_top(&mut pool, beam_width);
        round += 1;
        trace!(round, retained = pool.len(), nodes = tree.num_nodes(), "merged beam round");
        let best_done = pool
            .iter()
            .enumerate()
            .filter(|(_, node)| node.state.is_done())
            .max_by_key(|(_, node)| OrderedFloat(node.evaluated_score))
            .map(|(position, _)| position);
        if let Some(position) = best_done {
            let node = pool.swap_remove(position);
            let index = tree.insert(node);
            debug!(round, score = tree.evaluated_score(index), "reached done state");
            return Ok(tree.extract_actions(index));
        }
        for shard in &mut shards {
            shard.clear();
        }
        for (position, node) in pool.into_iter().enumerate() {
            let index = tree.insert(node);
            shards[position % num_workers].push(index);
        }
    }
}

/// One worker's share of a round: expand every node of the shard over all its legal actions, drop
/// dead children, evaluate the rest and keep at most the `beam_width` best scoring ones.
fn expand_shard<G>(tree: &Tree<G>, shard: &[usize], beam_width: usize) -> Vec<Node<G>>
where
    G: SinglePlayerGame,
{
    let mut children = Vec::new();
    let mut actions_buf = Vec::new();
    for &node_index in shard {
        tree.state(node_index).legal_actions(&mut actions_buf);
        for &action in &actions_buf {
            let mut child = tree.clone_advanced(node_index, action);
            if child.state.is_dead() {
                continue;
            }
            child.evaluate();
            children.push(child);
        }
    }
    select_top(&mut children, beam_width);
    children
}
