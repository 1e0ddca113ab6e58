pub mod auth;
pub mod require_role;
pub mod resolve_account;
pub mod response;

pub use auth::{authenticate, TokenIdentity};
pub use require_role::{require_admin, require_role};
pub use resolve_account::{resolve_account, CurrentAccount};
pub use response::{ApiResponse, ApiResult};
