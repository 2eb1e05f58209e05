use crate::SinglePlayerGame;

/// Index of the root node in [`Tree::nodes`].
pub const ROOT_INDEX: usize = 0;

/// A tree there the nodes wrap game states and remember the action which produced them. We store
/// all the nodes of the tree in a vector to avoid allocations and refer to them using indices.
/// Nodes are only ever appended, so indices stay valid for the lifetime of the tree and workers of
/// the multi threaded driver can follow parent links across shards without synchronization.
pub struct Tree<G: SinglePlayerGame> {
    /// All nodes of the tree. The root is at [`ROOT_INDEX`]; every other node is inserted by a
    /// driver after it survived dead state filtering and pruning.
    pub nodes: Vec<Node<G>>,
}

impl<G> Tree<G>
where
    G: SinglePlayerGame,
{
    /// Creates a new tree whose root node wraps `root_state`. The root has no parent and no last
    /// action.
    pub fn new(root_state: G) -> Self {
        Self {
            nodes: vec![Node {
                parent: usize::MAX,
                last_action: None,
                evaluated_score: 0.0,
                state: root_state,
            }],
        }
    }

    /// The one way to grow the tree by one ply: clone the state of the node at `parent_index`,
    /// play `action` on the clone and stamp parent link and last action. Cloning before advancing
    /// is mandatory, the parent state must remain untouched so sibling expansions remain valid.
    ///
    /// The returned node is not attached to the tree yet. Callers evaluate it, decide whether it
    /// survives dead state filtering and pruning and [`Tree::insert`] it if so. Its
    /// `evaluated_score` is left at the default until [`Node::evaluate`] is invoked.
    pub fn clone_advanced(&self, parent_index: usize, action: G::Action) -> Node<G> {
        let mut state = self.nodes[parent_index].state.clone();
        state.advance(action);
        Node {
            parent: parent_index,
            last_action: Some(action),
            evaluated_score: 0.0,
            state,
        }
    }

    /// Attach a node produced by [`Tree::clone_advanced`] and return its index.
    pub fn insert(&mut self, node: Node<G>) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// State wrapped by the node at `index`.
    pub fn state(&self, index: usize) -> &G {
        &self.nodes[index].state
    }

    /// Cached evaluated score of the node at `index`. Meaningful only after [`Node::evaluate`] has
    /// been invoked, or the field has been written directly.
    pub fn evaluated_score(&self, index: usize) -> f64 {
        self.nodes[index].evaluated_score
    }

    /// The ordered action sequence leading from the root to the node at `index`. Walks the parent
    /// links up to the root, collecting each visited node's last action, and reverses the result.
    pub fn extract_actions(&self, index: usize) -> Vec<G::Action> {
        let mut actions = Vec::new();
        let mut node = &self.nodes[index];
        while let (Some(parent_index), Some(action)) = (node.parent_index(), node.last_action) {
            actions.push(action);
            node = &self.nodes[parent_index];
        }
        actions.reverse();
        actions
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}

/// Wrapper around a user state carrying the bookkeeping the engine needs to reconstruct action
/// sequences and order candidates.
pub struct Node<G: SinglePlayerGame> {
    /// Index of the parent node. The root node will be set to `usize::MAX`.
    pub parent: usize,
    /// Action applied to the parent state to reach this node. `None` only at the root.
    pub last_action: Option<G::Action>,
    /// Cached score used for ordering between candidates. `0.0` until [`Node::evaluate`] runs or
    /// the field is set directly; the two forms are equivalent.
    pub evaluated_score: f64,
    /// The wrapped user state.
    pub state: G,
}

impl<G> Node<G>
where
    G: SinglePlayerGame,
{
    pub fn parent_index(&self) -> Option<usize> {
        (self.parent != usize::MAX).then_some(self.parent)
    }

    /// Invoke the user scorer and cache its result on the node. Idempotent with respect to
    /// subsequent ordering.
    pub fn evaluate(&mut self) -> f64 {
        self.evaluated_score = self.state.evaluate_score();
        self.evaluated_score
    }
}
