use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use thiserror::Error;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to {operation} on collection `{collection}`")]
    Operation {
        operation: &'static str,
        collection: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("transaction failed while trying to {operation}")]
    Transaction {
        operation: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("document in `{collection}` holds an invalid identifier `{value}` in `{field}`")]
    CorruptDocument {
        collection: &'static str,
        field: &'static str,
        value: String,
        #[source]
        source: uuid::Error,
    },
}

impl MongoDaoError {
    /// Build a closure wrapping a driver error for `operation` on `collection`.
    pub fn op(
        operation: &'static str,
        collection: &'static str,
    ) -> impl FnOnce(MongoError) -> Self {
        move |source| MongoDaoError::Operation {
            operation,
            collection,
            source,
        }
    }

    /// Collection whose unique index rejected the write, if that is what happened.
    pub fn duplicate_key_collection(&self) -> Option<&'static str> {
        match self {
            MongoDaoError::Operation {
                collection, source, ..
            } if is_duplicate_key(source) => Some(collection),
            _ => None,
        }
    }

    /// Whether the failure stems from reaching the server rather than from the operation.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            MongoDaoError::InvalidUri { .. }
                | MongoDaoError::ClientConstruction { .. }
                | MongoDaoError::InitialPing { .. }
                | MongoDaoError::HealthPing { .. }
        )
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY_CODE
    )
}
