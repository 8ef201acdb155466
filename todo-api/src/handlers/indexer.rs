//! Step Functions task handler that indexes an already stored record

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::todo::TodoService;
use crate::types::TodoResult;

/// Task input: where the record lives and which id it should carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRequest {
    /// Object store key of the record
    pub key: String,
    /// Expected todo id
    pub id: String,
}

/// Task output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResponse {
    /// Indexed todo id
    pub id: String,
    /// Always `Indexed`
    pub status: String,
}

/// Indexes the record named by the task input
///
/// # Errors
///
/// Returns the service error unchanged so the state machine can retry or catch it
pub async fn handle(service: &TodoService, request: IndexRequest) -> TodoResult<IndexResponse> {
    let id = service
        .index(&request.key, &request.id)
        .await
        .inspect_err(|e| {
            error!(
                key = %request.key,
                id = %request.id,
                kind = e.kind(),
                error = %e,
                "Indexing failed"
            );
        })?;

    Ok(IndexResponse {
        id,
        status: "Indexed".to_string(),
    })
}
