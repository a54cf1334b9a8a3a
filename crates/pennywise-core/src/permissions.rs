//! Permission constants for the Pennywise API.
//!
//! Permissions are plain strings held in an account's permission set. Use
//! these constants instead of literals so checks stay consistent.
//!
//! # Example
//!
//! ```ignore
//! use pennywise_core::{AuthorizationGuard, permissions};
//!
//! if AuthorizationGuard::require_permission(&account, permissions::ACCOUNTS_MANAGE) {
//!     // change another account's role
//! }
//! ```

// =============================================================================
// Accounts permissions
// =============================================================================

/// Permission to view other accounts
pub const ACCOUNTS_READ: &str = "accounts:read";
/// Permission to change another account's role and permissions
pub const ACCOUNTS_MANAGE: &str = "accounts:manage";

// =============================================================================
// Transactions permissions
// =============================================================================

/// Permission to read transactions
pub const TRANSACTIONS_READ: &str = "transactions:read";
/// Permission to create and edit transactions
pub const TRANSACTIONS_WRITE: &str = "transactions:write";

// =============================================================================
// Insights permissions
// =============================================================================

/// Permission to request AI insights
pub const INSIGHTS_READ: &str = "insights:read";

/// Every permission the API checks.
pub const ALL: [&str; 5] = [
    ACCOUNTS_READ,
    ACCOUNTS_MANAGE,
    TRANSACTIONS_READ,
    TRANSACTIONS_WRITE,
    INSIGHTS_READ,
];

pub fn is_known(permission: &str) -> bool {
    ALL.contains(&permission)
}
