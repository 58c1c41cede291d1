use thiserror::Error;

#[derive(Debug, Error)]
pub enum PowerError {
    #[error("cannot delegate to yourself")]
    SelfDelegation,
}
