//! Network messages - communication between App and Network layers

use crate::error::Operation;
use crate::models::{Record, RecordFields};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum ApiCommand {
    /// Fetch the full record list
    List { id: u64 },
    /// Create a new record from the submitted fields
    Create { id: u64, fields: RecordFields },
    /// Replace the non-identifier fields of an existing record
    Update {
        id: u64,
        record_id: i64,
        fields: RecordFields,
    },
    /// Delete a record by identifier
    Delete { id: u64, record_id: i64 },
    /// Shutdown the network actor
    Shutdown,
}

impl ApiCommand {
    pub fn operation(&self) -> Option<Operation> {
        match self {
            ApiCommand::List { .. } => Some(Operation::List),
            ApiCommand::Create { .. } => Some(Operation::Create),
            ApiCommand::Update { .. } => Some(Operation::Update),
            ApiCommand::Delete { .. } => Some(Operation::Delete),
            ApiCommand::Shutdown => None,
        }
    }
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum ApiResponse {
    /// The list as returned by the server, in server order
    Listed { id: u64, records: Vec<Record> },
    /// Create or update succeeded
    Saved { id: u64, record: Option<Record> },
    /// Delete succeeded
    Deleted { id: u64, record_id: i64 },
    /// Any failure, already rendered for display
    Failed {
        id: u64,
        operation: Operation,
        message: String,
        status: Option<u16>,
    },
}

impl ApiResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            ApiResponse::Listed { id, .. } => *id,
            ApiResponse::Saved { id, .. } => *id,
            ApiResponse::Deleted { id, .. } => *id,
            ApiResponse::Failed { id, .. } => *id,
        }
    }
}
