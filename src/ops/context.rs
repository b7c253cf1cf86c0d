//! Execution context
//!
//! One context is created per top-level execution and discarded after it;
//! contexts are never shared across concurrent executions. The identity it
//! carries is opaque to the core.

use crate::core::types::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// The requesting identity; the core never interprets it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User(Arc<str>);

impl User {
    /// Identity used when no user is supplied
    pub const UNKNOWN: &'static str = "UNKNOWN";

    /// Create a user from its identifier
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// The user identifier
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new(Self::UNKNOWN)
    }
}

/// Per-execution scope: the requesting user, a generated job id, and
/// chain-scoped variables
#[derive(Debug, Clone)]
pub struct Context {
    user: User,
    job_id: Uuid,
    variables: HashMap<String, Value>,
}

impl Context {
    /// Create a context for the given user with a fresh job id
    pub fn new(user: User) -> Self {
        Self {
            user,
            job_id: Uuid::new_v4(),
            variables: HashMap::new(),
        }
    }

    /// The requesting user
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Job id identifying this execution in diagnostics
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Set a chain-scoped variable
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Read a chain-scoped variable
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(User::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_context_gets_a_distinct_job_id() {
        let user = User::new("alice");
        let a = Context::new(user.clone());
        let b = Context::new(user);
        assert_ne!(a.job_id(), b.job_id());
    }

    #[test]
    fn variables_are_chain_scoped() {
        let mut ctx = Context::default();
        assert_eq!(ctx.user().id(), User::UNKNOWN);
        ctx.set_variable("limit", 10i64);
        assert_eq!(ctx.variable("limit"), Some(&Value::Long(10)));
        assert_eq!(ctx.variable("missing"), None);
    }
}
