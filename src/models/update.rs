use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decode;
use crate::error::Result;

/// What the bot was allowed to change during an update.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateActions {
    #[serde(alias = "canManageRoles")]
    pub can_manage_roles: bool,
    #[serde(alias = "canManageNicknames")]
    pub can_manage_nicknames: bool,
}

/// Result of a role and nickname sync for one guild member.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub actions: UpdateActions,
    pub roles: Vec<String>,
    #[serde(alias = "unmanageableBoundRoles")]
    pub unmanageable_bound_roles: Vec<String>,
    #[serde(alias = "addedRoles")]
    pub added_roles: Vec<String>,
    #[serde(alias = "removedRoles")]
    pub removed_roles: Vec<String>,
    #[serde(alias = "failedRoles")]
    pub failed_roles: Vec<String>,
}

impl UpdateOutcome {
    pub fn from_api(payload: Value) -> Result<Self> {
        decode("UpdateOutcome", payload)
    }

    /// True when the sync added or removed at least one role.
    pub fn changed(&self) -> bool {
        !self.added_roles.is_empty() || !self.removed_roles.is_empty()
    }
}
