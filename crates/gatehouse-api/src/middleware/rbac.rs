//! Role guards for handlers that need more than an authenticated caller.

use gatehouse_core::error::AppError;
use gatehouse_core::types::Principal;

/// Role required by the admin routes.
pub const ADMIN_ROLE: &str = "admin";

/// Passes when the principal holds at least one of `roles`.
pub fn require_any_role(principal: &Principal, roles: &[&str]) -> Result<(), AppError> {
    if roles.iter().any(|role| principal.has_role(role)) {
        return Ok(());
    }

    tracing::debug!(
        username = %principal.username,
        required = ?roles,
        "Role check failed"
    );
    Err(AppError::authorization("Insufficient role for this resource"))
}

/// Checks that the principal has the admin role.
pub fn require_admin(principal: &Principal) -> Result<(), AppError> {
    require_any_role(principal, &[ADMIN_ROLE])
}
