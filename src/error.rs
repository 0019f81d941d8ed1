use crate::node::NodeId;
use crate::tags::Tag;
use thiserror::Error;

pub type TreeResult<T> = Result<T, TreeError>;

#[derive(Error, Debug, Clone)]
pub enum TreeError {
    #[error("Node '{id}' not found in the tree")]
    NotFound { id: NodeId },

    #[error("Node '{id}' is not an element and cannot hold children")]
    NotAnElement { id: NodeId },

    #[error("Tag '{child}' is not a valid child of '{parent}'")]
    InvalidChildTag { parent: Tag, child: Tag },

    #[error("Text content is not permitted inside '{parent}'")]
    TextNotPermitted { parent: Tag },

    #[error("The root node cannot be deleted or reparented")]
    RootImmutable,

    #[error("Cannot reparent '{id}' into itself")]
    SelfParent { id: NodeId },

    #[error("Cannot reparent '{id}' into its own descendant '{descendant}'")]
    CycleDetected { id: NodeId, descendant: NodeId },

    #[error("Patch kind does not match node '{id}'")]
    PatchKindMismatch { id: NodeId },

    #[error("Children patch for '{id}' must reorder its current children, not add or drop ids")]
    ChildrenMismatch { id: NodeId },

    #[error("Duplicate id '{id}': node ids must be unique within the document")]
    DuplicateId { id: NodeId },

    #[error("Id 'root' is reserved for the root alias and cannot be used as a node id")]
    ReservedId,

    #[error("Document root must be an element node")]
    TextRoot,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("YAML error: {0}")]
    YamlError(String),
}

impl From<serde_yaml::Error> for TreeError {
    fn from(err: serde_yaml::Error) -> Self {
        TreeError::YamlError(err.to_string())
    }
}
