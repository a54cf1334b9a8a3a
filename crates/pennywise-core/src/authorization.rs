//! Role and permission predicates.
//!
//! [`AuthorizationGuard`] only answers yes or no. The caller decides whether
//! a failed check rejects the request (server) or hides a control (client).

use std::collections::BTreeSet;

use crate::roles::Role;

/// Anything carrying a role and an optional permission set.
pub trait Authorizable {
    fn role(&self) -> Role;

    fn permissions(&self) -> Option<&BTreeSet<String>>;
}

pub struct AuthorizationGuard;

impl AuthorizationGuard {
    /// True iff the account's role rank is at least `minimum`'s rank.
    pub fn require_role<A>(account: &A, minimum: Role) -> bool
    where
        A: Authorizable + ?Sized,
    {
        account.role().rank() >= minimum.rank()
    }

    /// True iff `permission` is in the account's permission set.
    pub fn require_permission<A>(account: &A, permission: &str) -> bool
    where
        A: Authorizable + ?Sized,
    {
        account
            .permissions()
            .is_some_and(|granted| granted.contains(permission))
    }
}
