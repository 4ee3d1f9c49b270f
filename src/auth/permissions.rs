//! Role predicates and access checks.
//!
//! Each predicate is a pure function of the authenticated user; handlers
//! compose them with [`require_any`] where an endpoint accepts several
//! roles. There is no implicit permission registry: every route states its
//! own policy at the call site.

use crate::{
    api::models::users::{CurrentUser, Role},
    errors::Error,
};

pub fn is_admin(user: &CurrentUser) -> bool {
    user.role == Role::Admin
}

pub fn is_teacher(user: &CurrentUser) -> bool {
    user.role == Role::Teacher
}

pub fn is_student(user: &CurrentUser) -> bool {
    user.role == Role::Student
}

/// Require that at least one of the given predicates holds for the user.
/// `resource` names what was being accessed, for the error message.
pub fn require_any(user: &CurrentUser, predicates: &[fn(&CurrentUser) -> bool], action: &'static str, resource: &str) -> Result<(), Error> {
    if predicates.iter().any(|p| p(user)) {
        Ok(())
    } else {
        Err(Error::Forbidden {
            action,
            resource: resource.to_string(),
        })
    }
}

pub fn require_admin(user: &CurrentUser, action: &'static str, resource: &str) -> Result<(), Error> {
    require_any(user, &[is_admin], action, resource)
}

pub fn require_student(user: &CurrentUser, action: &'static str, resource: &str) -> Result<(), Error> {
    require_any(user, &[is_student], action, resource)
}
