//! Request identity and ownership checks.
//!
//! `identity` resolves who is calling, once per request, and hands it to
//! handlers through the `CurrentTeacher` extractor. `guard` decides whether that
//! caller may act on a resource owned by a given teacher.

pub mod guard;
pub mod identity;

pub use guard::{Decision, DenyReason, OwnershipGuard};
pub use identity::{
    resolve_identity, AuthIdentityProvider, CurrentTeacher, HeaderIdentityProvider, TeacherId,
};
