use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("failed to open LMDB environment: {0}")]
    Open(String),

    #[error("failed to create database {name}: {source_msg}")]
    CreateDatabase { name: &'static str, source_msg: String },
}

impl From<LmdbError> for tribunal_store::StoreError {
    fn from(e: LmdbError) -> Self {
        tribunal_store::StoreError::Backend(e.to_string())
    }
}
