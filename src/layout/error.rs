use crate::ir::{EdgeKind, PersonId};

/// Validation failures. None of them leave a partial layout behind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("duplicate person id={id}")]
    DuplicateId { id: PersonId },

    /// Only raised when `failOnUnknownIds` is on.
    #[error("{kind} edge references unknown person id={id}")]
    UnknownReference { id: PersonId, kind: EdgeKind },

    #[error("person id={id} cannot be their own spouse")]
    SelfSpouse { id: PersonId },

    #[error("person id={id} cannot be their own parent")]
    SelfParent { id: PersonId },

    #[error("child id={child} has {count} distinct parents (at most 2 allowed)")]
    TooManyParents { child: PersonId, count: usize },

    #[error("root id={id} is not among the people")]
    UnknownRoot { id: PersonId },

    #[error("layout options do not name a root id")]
    MissingRootId,

    #[error("layout option {name} is out of range: {value}")]
    InvalidOption { name: &'static str, value: f32 },
}
