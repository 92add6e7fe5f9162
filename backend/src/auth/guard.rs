use crate::auth::identity::TeacherId;
use crate::error::ApiError;

/// Why a caller was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No authenticated caller at all (401).
    Unauthenticated,
    /// Authenticated, but not the resource owner (403).
    NotOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn into_result(self) -> Result<(), ApiError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::Unauthenticated) => Err(ApiError::AuthenticationRequired),
            Decision::Deny(DenyReason::NotOwner) => Err(ApiError::Forbidden(
                "You do not have permission to modify this resource.".to_string(),
            )),
        }
    }
}

/// Compares the acting teacher against a resource's recorded owner.
///
/// Callers look the resource up first, so a missing resource is reported as
/// `NotFound` before the guard runs. Student submission and the code-based
/// read paths never call the guard.
pub struct OwnershipGuard;

impl OwnershipGuard {
    pub fn authorize(actor: Option<TeacherId>, owner: TeacherId) -> Decision {
        match actor {
            None => Decision::Deny(DenyReason::Unauthenticated),
            Some(id) if id == owner => Decision::Allow,
            Some(_) => Decision::Deny(DenyReason::NotOwner),
        }
    }

    /// `authorize`, mapped onto the error taxonomy.
    pub fn require(actor: Option<TeacherId>, owner: TeacherId) -> Result<(), ApiError> {
        Self::authorize(actor, owner).into_result()
    }

    /// Any authenticated teacher passes; used where no owner exists yet.
    pub fn require_authenticated(actor: Option<TeacherId>) -> Result<TeacherId, ApiError> {
        actor.ok_or(ApiError::AuthenticationRequired)
    }
}
