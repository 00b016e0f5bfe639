/// Errors raised by store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Connection or command failure from Redis.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A stored value could not be decoded.
    #[error("Corrupt record at {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;
