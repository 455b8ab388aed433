//! Error types for bim-query.

use crate::model::EntityId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while editing a [`Model`](crate::model::Model).
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    /// An entity with this id already exists.
    #[error("entity {id} already exists")]
    DuplicateId { id: EntityId },

    /// The referenced entity is not part of the model.
    #[error("entity {id} not found")]
    UnknownEntity { id: EntityId },

    /// The entity's class cannot play the role the edit requires.
    #[error("entity {id} ({class}) cannot be used as {role}")]
    InvalidRole {
        id: EntityId,
        class: String,
        role: &'static str,
    },
}

/// Errors raised by the query facade.
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    /// The selector expression could not be parsed.
    #[error("malformed query '{expression}': {message}")]
    MalformedQuery { expression: String, message: String },

    /// A relationship chain revisited an entity.
    #[error("cyclic {relation} chain: entity {repeated} reached twice starting from {start}")]
    CyclicGraph {
        relation: &'static str,
        start: EntityId,
        repeated: EntityId,
    },

    /// The referenced entity is not part of the model.
    #[error("entity {id} not found")]
    UnknownEntity { id: EntityId },
}

impl QueryError {
    pub(crate) fn malformed(expression: &str, message: impl Into<String>) -> Self {
        QueryError::MalformedQuery {
            expression: expression.to_string(),
            message: message.into(),
        }
    }
}

/// Errors that can occur when reading or writing model snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Failed to read the snapshot from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The JSON document is not a valid snapshot.
    #[error("invalid snapshot: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// The snapshot decoded but describes an inconsistent model.
    #[error("inconsistent snapshot: {source}")]
    Model {
        #[from]
        source: ModelError,
    },
}

/// Errors that can occur when exporting data.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },

    /// Resolving a row's container failed.
    #[error("query failed: {source}")]
    Query {
        #[from]
        source: QueryError,
    },
}
