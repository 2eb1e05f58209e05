use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::{
    tree::{Node, Tree, ROOT_INDEX},
    SearchError, SinglePlayerGame,
};

/// Expands the most promising `beam_width` candidates each round and returns the action sequence
/// leading to the first discovered done state. There is no fixed depth, the search runs until a
/// round produces a done child or runs out of candidates.
///
/// Each round every retained candidate is expanded over all its legal actions. Dead children are
/// discarded. The remaining children are evaluated and inserted into a bounded priority queue,
/// which keeps the `beam_width` best scoring ones. Children which reach done do not enter the
/// queue; the best of them ends the search once the round is over. Children scoring no better than
/// the worst retained candidate of a full queue are discarded outright, so ties favor the
/// candidate which entered the queue first.
pub fn beam_search_action<G>(root: G, beam_width: usize) -> Result<Vec<G::Action>, SearchError>
where
    G: SinglePlayerGame,
{
    assert!(beam_width >= 1, "beam width must be at least one");
    if root.is_done() {
        return Ok(Vec::new());
    }
    if root.is_dead() {
        return Err(SearchError::NoFeasiblePath);
    }

    let mut tree = Tree::new(root);
    let mut now = BoundedBeam::new(beam_width);
    now.insert(ROOT_INDEX, 0.0);
    // Winning terminal found so far, together with its score. The first round which sets this
    // ends the search.
    let mut best: Option<(usize, f64)> = None;
    let mut actions_buf = Vec::new();
    let mut round = 0u32;
    loop {
        let mut next = BoundedBeam::new(beam_width);
        while let Some(node_index) = now.pop() {
            tree.state(node_index).legal_actions(&mut actions_buf);
            for &action in &actions_buf {
                let mut child = tree.clone_advanced(node_index, action);
                if child.state.is_dead() {
                    continue;
                }
                // Evaluate before gating, so pruning decisions are exact.
                let score = child.evaluate();
                if !next.admits(score) {
                    continue;
                }
                if child.state.is_done() {
                    if best.map_or(true, |(_, best_score)| score > best_score) {
                        let index = tree.insert(child);
                        best = Some((index, score));
                    }
                    continue;
                }
                let index = tree.insert(child);
                next.insert(index, score);
            }
        }
        round += 1;
        trace!(round, retained = next.len(), nodes = tree.num_nodes(), "expanded beam round");
        if let Some((index, score)) = best {
            debug!(round, score, "reached done state");
            return Ok(tree.extract_actions(index));
        }
        if next.is_empty() {
            return Err(SearchError::NoFeasiblePath);
        }
        now = next;
    }
}

/// Same pruning semantics as [`beam_search_action`], but each round collects all surviving
/// children into one unsorted buffer and collapses it in a single linear time partial selection.
/// Preferable for wide beams, there per insert heap bookkeeping costs more than one selection pass
/// over the round's buffer.
///
/// Done children enter the buffer and compete in the selection like everyone else; the search ends
/// on the first round with a done survivor, returning the best scoring one. Equivalent to
/// [`beam_search_action`] up to tie break ordering.
pub fn beam_search_action_by_partial<G>(
    root: G,
    beam_width: usize,
) -> Result<Vec<G::Action>, SearchError>
where
    G: SinglePlayerGame,
{
    assert!(beam_width >= 1, "beam width must be at least one");
    if root.is_done() {
        return Ok(Vec::new());
    }
    if root.is_dead() {
        return Err(SearchError::NoFeasiblePath);
    }

    let mut tree = Tree::new(root);
    let mut now = vec![ROOT_INDEX];
    let mut actions_buf = Vec::new();
    let mut round = 0u32;
    loop {
        let mut buffer = Vec::new();
        for &node_index in &now {
            tree.state(node_index).legal_actions(&mut actions_buf);
            for &action in &actions_buf {
                let mut child = tree.clone_advanced(node_index, action);
                if child.state.is_dead() {
                    continue;
                }
                child.evaluate();
                buffer.push(child);
            }
        }
        if buffer.is_empty() {
            return Err(SearchError::NoFeasiblePath);
        }
        select_top(&mut buffer, beam_width);
        round += 1;
        trace!(round, retained = buffer.len(), "collapsed beam round");
        let best_done = buffer
            .iter()
            .enumerate()
            .filter(|(_, node)| node.state.is_done())
            .max_by_key(|(_, node)| OrderedFloat(node.evaluated_score))
            .map(|(position, _)| position);
        if let Some(position) = best_done {
            let node = buffer.swap_remove(position);
            let index = tree.insert(node);
            debug!(round, score = tree.evaluated_score(index), "reached done state");
            return Ok(tree.extract_actions(index));
        }
        now.clear();
        now.extend(buffer.into_iter().map(|node| tree.insert(node)));
    }
}

/// Linear time partial selection: place the `width` best scoring nodes in the first `width`
/// positions, in unspecified order among them, and drop the rest.
pub(crate) fn select_top<G>(buffer: &mut Vec<Node<G>>, width: usize)
where
    G: SinglePlayerGame,
{
    if buffer.len() > width {
        buffer.select_nth_unstable_by(width - 1, |a, b| {
            OrderedFloat(b.evaluated_score).cmp(&OrderedFloat(a.evaluated_score))
        });
        buffer.truncate(width);
    }
}

/// Bounded priority queue over candidate nodes: a min-heap inverted so its top is the worst
/// retained candidate, which makes capping the size cheap. Checking the top tells whether an
/// incoming candidate is worth keeping at all, and pushing beyond the width is undone by one pop.
struct BoundedBeam {
    heap: BinaryHeap<Reverse<Candidate>>,
    width: usize,
    /// Insertion counter, used to order candidates with equal scores.
    inserted: u64,
}

impl BoundedBeam {
    fn new(width: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(width + 1),
            width,
            inserted: 0,
        }
    }

    /// `false` if a candidate with this score would be evicted again right after its insert. Ties
    /// go to the candidates already retained.
    fn admits(&self, score: f64) -> bool {
        self.heap.len() < self.width
            || self
                .heap
                .peek()
                .map_or(true, |Reverse(worst)| worst.score < OrderedFloat(score))
    }

    fn insert(&mut self, node_index: usize, score: f64) {
        self.heap.push(Reverse(Candidate {
            score: OrderedFloat(score),
            inserted: self.inserted,
            node_index,
        }));
        self.inserted += 1;
        if self.heap.len() > self.width {
            self.heap.pop();
        }
    }

    /// Remove and return the worst retained candidate.
    fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|Reverse(candidate)| candidate.node_index)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Worst first ordering: lower scores are smaller, equal scores order the later insertion first.
/// An eviction therefore removes the most recently inserted of the worst candidates, so earlier
/// insertions survive, consistent with [`BoundedBeam::admits`] rejecting incoming ties.
struct Candidate {
    score: OrderedFloat<f64>,
    inserted: u64,
    node_index: usize,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.inserted.cmp(&self.inserted))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}
