/// Single player games are games there one player repeatedly picks actions, until the game ends in
/// either a rewarding terminal state or a disqualifying one. Anything implementing this trait can
/// be searched by the drivers of this crate.
///
/// Implementations of [`Clone`] must produce a deep, independent copy. The drivers clone states
/// before advancing them, so sibling expansions stay valid, and the multi threaded driver shares
/// states between workers by reference.
pub trait SinglePlayerGame: Clone {
    /// A possible action to take in the game.
    type Action: Copy + Eq;

    /// All actions the player may take in the current state.
    ///
    /// # Parameters
    ///
    /// * `actions_buf`: In order to avoid repeated allocations to store legal actions, callers
    ///   supply a buffer to hold them to the method. The buffer will always contain a complete and
    ///   exclusive list of all legal actions after the call. This implies it being empty in case
    ///   the state offers no continuation.
    fn legal_actions(&self, actions_buf: &mut Vec<Self::Action>);

    /// Change the state by playing an action. Precondition: The action must be legal.
    fn advance(&mut self, action: Self::Action);

    /// `true` if the game reached a rewarding terminal state. The first done state discovered by a
    /// beam driver ends the search, no matter its depth.
    fn is_done(&self) -> bool;

    /// `true` if the game reached a disqualifying state, e.g. stepped into a trap. Dead states are
    /// discarded, they are never retained in a beam nor reported as a result.
    fn is_dead(&self) -> bool;

    /// Heuristic worth of the current state, greater is better. Implementations are free to cache
    /// the value inside the state; the engine caches the returned value on the search node either
    /// way, see [`crate::Node::evaluate`].
    ///
    /// Candidates with equal scores are kept or dropped based on insertion order, which differs
    /// between drivers. Implementations which need identical results across drivers must make the
    /// order total, e.g. by salting the score with the turn count.
    fn evaluate_score(&mut self) -> f64;
}
