use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CoreError, CoreResult};

/// Restaurant roles issued by the identity provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Owner,
    Manager,
    Staff,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Owner => "OWNER",
            Role::Manager => "MANAGER",
            Role::Staff => "STAFF",
        };
        f.write_str(name)
    }
}

/// New sign-ups stay pending until an owner approves them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Things a signed-in user may ask the service to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ViewCatalog,
    RequestPricingAdvice,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::ViewCatalog => f.write_str("view the catalog"),
            Capability::RequestPricingAdvice => f.write_str("request pricing advice"),
        }
    }
}

/// Verified caller, as resolved from the session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub email: Option<String>,
    pub role: Role,
    pub approval: ApprovalStatus,
}

impl Principal {
    /// Check the caller may use a capability.
    ///
    /// Unapproved accounts can do nothing. Pricing advice is limited to owners and managers.
    pub fn authorize(&self, capability: Capability) -> CoreResult<()> {
        if self.approval != ApprovalStatus::Approved {
            return Err(CoreError::NotApproved(self.user_id.clone()));
        }

        let allowed = match capability {
            Capability::ViewCatalog => true,
            Capability::RequestPricingAdvice => matches!(self.role, Role::Owner | Role::Manager),
        };

        if allowed {
            Ok(())
        } else {
            Err(CoreError::Forbidden { role: self.role, capability })
        }
    }
}
