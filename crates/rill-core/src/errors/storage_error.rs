/// Errors surfaced by implementations of the durable-storage hook.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to persist fold result: {details}")]
    PersistFailed { details: String },

    #[error("failed to load stream record: {details}")]
    LoadFailed { details: String },
}
