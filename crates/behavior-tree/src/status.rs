//! Status returned by behavior nodes.

/// The result of evaluating a behavior node.
///
/// There is no `Running` state: a node either finished successfully or it
/// did not. Waiting for game logic is never expressed through the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The condition held or the action was performed.
    Success,

    /// The condition did not hold or the action could not be performed.
    Failure,
}

impl Status {
    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Success becomes Failure and vice versa.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
        }
    }
}

impl From<bool> for Status {
    #[inline]
    fn from(value: bool) -> Self {
        if value {
            Status::Success
        } else {
            Status::Failure
        }
    }
}
