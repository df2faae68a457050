pub mod identity;

pub use identity::{ApprovalStatus, Capability, Principal, Role};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Account is not approved: {0}")]
    NotApproved(String),
    #[error("Role {role} may not {capability}")]
    Forbidden { role: Role, capability: Capability },
}

pub type CoreResult<T> = Result<T, CoreError>;
