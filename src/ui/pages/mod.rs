//! Application pages
//!
//! - Home (`/`): redirects by auth state
//! - Login and register
//! - Student, faculty and admin dashboards
//! - Profile

mod admin;
mod faculty;
mod home;
mod login;
mod not_found;
mod profile;
mod register;
mod student;

pub use admin::AdminDashboardPage;
pub use faculty::FacultyDashboardPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use profile::ProfilePage;
pub use register::RegisterPage;
pub use student::StudentDashboardPage;
