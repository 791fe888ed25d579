use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::models::name::ClientName;

/// Whether a client is currently seen. Clients are never physically deleted;
/// deactivation is the only lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientStatus {
    Active,
    Inactive,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "Active",
            ClientStatus::Inactive => "Inactive",
        }
    }

    /// Parse the value stored in the status extension. Unknown values are
    /// treated as unset.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value.trim() {
            v if v.eq_ignore_ascii_case("active") => Some(ClientStatus::Active),
            v if v.eq_ignore_ascii_case("inactive") => Some(ClientStatus::Inactive),
            _ => None,
        }
    }

    /// Move to `next`. `Active → Inactive` and staying put are allowed;
    /// an inactive client cannot be reactivated.
    pub fn transition(self, next: ClientStatus) -> Result<ClientStatus, CoreError> {
        match (self, next) {
            (from, to) if from == to => Ok(to),
            (ClientStatus::Active, ClientStatus::Inactive) => Ok(ClientStatus::Inactive),
            (from, to) => Err(CoreError::InvalidStatusTransition { from, to }),
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A client as read back from the clinical data store.
///
/// The identity is assigned by the store at creation and is read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClientRecord {
    id: String,
    name: ClientName,
    display_name: String,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_session: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<ClientStatus>,
}

impl ClientRecord {
    pub fn new(
        id: impl Into<String>,
        name: ClientName,
        email: impl Into<String>,
        next_session: Option<String>,
        status: Option<ClientStatus>,
    ) -> Self {
        let display_name = name.display_name();
        Self {
            id: id.into(),
            name,
            display_name,
            email: email.into(),
            next_session,
            status,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &ClientName {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn next_session(&self) -> Option<&str> {
        self.next_session.as_deref()
    }

    /// The stored status, `None` when the record carries no status entry.
    pub fn status(&self) -> Option<ClientStatus> {
        self.status
    }

    /// Status used for transitions; an unset status counts as active.
    pub fn effective_status(&self) -> ClientStatus {
        self.status.unwrap_or(ClientStatus::Active)
    }
}

/// Input for creating or updating a client. Carries no identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClientDraft {
    pub name: ClientName,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub next_session: Option<String>,
    #[serde(default)]
    pub status: Option<ClientStatus>,
}

impl ClientDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.email.trim().is_empty() {
            return Err(CoreError::MissingField("email".to_string()));
        }
        Ok(())
    }
}
