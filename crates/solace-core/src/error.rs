use thiserror::Error;

use crate::models::client::ClientStatus;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: ClientStatus, to: ClientStatus },

    #[error("missing required field: {0}")]
    MissingField(String),
}
