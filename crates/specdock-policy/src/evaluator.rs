//! Policy statement evaluation
//!
//! `evaluate` is the single decision primitive of the engine: given the
//! already-resolved, already-filtered statements that apply to a principal,
//! decide whether one `(action, resource)` request is allowed. The function
//! is total — it never panics, performs no I/O, and treats malformed
//! statements (empty action/resource lists) as matching nothing.
//!
//! Combination rule: union of allows minus any deny. A single matching Deny
//! suppresses every matching Allow regardless of order; there is no
//! most-specific-wins tie-break.

use regex::Regex;
use specdock_core::{Effect, Statement};

/// Decide whether `action` on `resource` is allowed by `statements`.
///
/// Default-deny: an empty statement list, or a list with no matching Allow,
/// yields `false`.
pub fn evaluate(statements: &[Statement], action: &str, resource: &str) -> bool {
    let mut allowed = false;
    let mut denied = false;

    for statement in statements {
        if !action_matches(&statement.action, action) {
            continue;
        }
        if !resource_matches(&statement.resource, resource) {
            continue;
        }
        match statement.effect {
            Effect::Allow => allowed = true,
            Effect::Deny => denied = true,
        }
    }

    allowed && !denied
}

/// True if any pattern in `patterns` matches `action`.
///
/// Patterns: `*` matches everything; `domain:*` matches any action in the
/// domain (prefix match up to the colon); anything else is an exact match.
/// An action without a colon can only be satisfied by `*` or exact equality.
fn action_matches(patterns: &[String], action: &str) -> bool {
    patterns.iter().any(|pattern| {
        if pattern == "*" {
            return true;
        }
        if let Some(domain) = pattern.strip_suffix(":*") {
            return action
                .strip_prefix(domain)
                .is_some_and(|rest| rest.starts_with(':'));
        }
        pattern == action
    })
}

/// True if any pattern in `patterns` matches `resource`.
///
/// `*` matches everything; otherwise the pattern is compiled to an anchored
/// regex where `*` becomes `.*` and every other character is literal.
fn resource_matches(patterns: &[String], resource: &str) -> bool {
    patterns.iter().any(|pattern| {
        if pattern == "*" {
            return true;
        }
        match glob_to_regex(pattern) {
            Some(re) => re.is_match(resource),
            // An uncompilable pattern matches nothing rather than failing
            // the whole evaluation.
            None => false,
        }
    })
}

/// Compile a `*` glob into an anchored regex.
///
/// All regex metacharacters except the glob `*` are escaped first, so
/// resource identifiers containing `.`, `+` and the like stay literal.
fn glob_to_regex(pattern: &str) -> Option<Regex> {
    let escaped = regex::escape(pattern).replace(r"\*", ".*");
    Regex::new(&format!("^{escaped}$")).ok()
}
