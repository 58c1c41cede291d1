use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("case error: {0}")]
    Case(#[from] tribunal_voting::CaseError),

    #[error("oracle error: {0}")]
    Oracle(#[from] tribunal_oracle::OracleError),

    #[error("reward error: {0}")]
    Reward(#[from] tribunal_rewards::RewardError),

    #[error("ledger error: {0}")]
    Ledger(#[from] tribunal_ledger::LedgerError),

    #[error("delegation error: {0}")]
    Power(#[from] tribunal_power::PowerError),

    #[error("store error: {0}")]
    Store(#[from] tribunal_store::StoreError),

    #[error("invalid member address: {0}")]
    InvalidAddress(String),

    #[error("config error: {0}")]
    Config(String),
}
