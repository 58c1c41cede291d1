use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// The collaborator could not be reached or answered garbage. Read
    /// paths treat this as "no data"; write paths surface it.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// The collaborator understood the instruction and refused it.
    #[error("collaborator rejected the instruction: {0}")]
    Rejected(String),
}
