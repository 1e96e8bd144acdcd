use leptos::prelude::*;

#[component]
pub fn Icon(
    /// Icon file name under `/icons`, without the `.svg` extension
    name: &'static str,
    #[prop(default = "w-5 h-5")] class: &'static str,
) -> impl IntoView {
    let icon_path = format!("/icons/{}.svg", name);

    view! {
        <img
            src=icon_path
            class=class
            alt=name
            draggable=false
        />
    }
}

/// Icons shipped with the portal
pub mod icons {
    pub const ALERT_CIRCLE: &str = "alert-circle";
    pub const BELL: &str = "bell";
    pub const BOOK: &str = "book";
    pub const CHECK: &str = "check";
    pub const CHEVRON_DOWN: &str = "chevron-down";
    pub const EYE: &str = "eye";
    pub const EYE_CLOSED: &str = "eye-closed";
    pub const HOME: &str = "home";
    pub const LOADER: &str = "loader";
    pub const LOGOUT: &str = "logout";
    pub const PLUS: &str = "plus";
    pub const TRASH: &str = "trash";
    pub const UPLOAD: &str = "upload";
    pub const USER: &str = "user";
    pub const WARNING: &str = "warning";
    pub const X: &str = "x";
}
