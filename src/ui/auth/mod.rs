//! Authentication UI module
//!
//! Auth context, sign-in and registration forms, the header user menu and
//! the page guard.

mod context;
mod guard;
mod login_form;
mod register_form;
mod user_menu;

pub use context::{AuthContext, AuthState, provide_auth_context, use_auth_context};
pub use guard::RequireAccess;
pub use login_form::LoginForm;
pub use register_form::RegisterForm;
pub use user_menu::{UserAvatar, UserMenu};
