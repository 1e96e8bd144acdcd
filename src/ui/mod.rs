pub mod activity_tracker;
pub mod alert_panel;
pub mod auth;
pub mod common;
pub mod icon;
pub mod layout;
pub mod pages;

pub use activity_tracker::ActivityMonitor;
pub use alert_panel::AlertPanel;
pub use icon::{Icon, icons};
pub use layout::{PortalLayout, Section};
