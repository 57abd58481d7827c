//! Identity of the acting backend user.
//!
//! Authentication mechanics live outside this module; the HTTP layer
//! resolves a trusted identity header against the user directory and makes
//! the result available as a request extension.

/// The authenticated backend user for the current request.
#[derive(Debug, Clone)]
pub struct AdminPrincipal {
    pub user_id: i64,
    pub display_name: String,
    /// God users may change elevated module settings.
    pub is_god: bool,
}
