//! Specdock Policy - catalog, evaluator and access resolution
//!
//! Three layers, from the bottom up:
//! - [`evaluator`]: a pure function deciding one `(action, resource)` request
//!   against a flat list of statements. Deny overrides allow.
//! - [`catalog`]: the fixed vocabulary of actions and the managed policies
//!   that bundle them.
//! - [`access`]: resolves a member's applicable statements (role bypass,
//!   workspace policy flags, attached managed policies, custom policies) and
//!   feeds them to the evaluator.

pub mod access;
pub mod catalog;
pub mod evaluator;

pub use access::{check_access, gather_statements, workspace_policy_to_statements, AccessRequest};
pub use catalog::{actions, managed_policies, managed_policy, ActionDefinition};
pub use evaluator::evaluate;
