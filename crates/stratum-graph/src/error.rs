#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("node not found: {id}")]
    MissingNode { id: String },
    #[error("edge id already in use: {id}")]
    DuplicateEdge { id: String },
    #[error("making {parent} the parent of {node} would create a containment cycle")]
    ParentCycle { node: String, parent: String },
    #[error("graph contains a cycle")]
    Cycle,
}

pub type Result<T> = std::result::Result<T, GraphError>;
