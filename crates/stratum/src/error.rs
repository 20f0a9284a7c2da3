use stratum_graph::GraphError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout configuration: {message}")]
    InvalidConfig { message: String },
    #[error("node order references unknown node: {id}")]
    UnknownNode { id: String },
    #[error("edge {id} has minlen {minlen}, more than {max}")]
    MinlenTooLarge { id: String, minlen: usize, max: usize },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type Result<T> = std::result::Result<T, Error>;
