use thiserror::Error;

/// Fatal conditions reported by the search drivers. Per candidate conditions (dead states,
/// candidates pruned by score) are discarded silently by design and never surface here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The beam emptied without any state reaching done: every path ended dead, without legal
    /// actions, or was pruned. Distinct from an empty successful result, which means the root was
    /// already done and there is nothing to play.
    #[error("beam exhausted without reaching a done state; every path was dead or pruned")]
    NoFeasiblePath,
}
