use leptos::prelude::*;

/// Spinner size options
#[derive(Clone, Copy, PartialEq)]
pub enum SpinnerSize {
    Small,
    Medium,
    Large,
}

impl SpinnerSize {
    fn class(&self) -> &'static str {
        match self {
            SpinnerSize::Small => "h-4 w-4 border-2",
            SpinnerSize::Medium => "h-8 w-8 border-4",
            SpinnerSize::Large => "h-12 w-12 border-4",
        }
    }
}

/// Ring spinner with an optional label
#[component]
pub fn Spinner(
    #[prop(default = SpinnerSize::Medium)] size: SpinnerSize,
    #[prop(default = "")] label: &'static str,
    /// Center the spinner in its container
    #[prop(default = false)]
    centered: bool,
) -> impl IntoView {
    let container_class = if centered {
        "flex flex-col items-center justify-center gap-3 py-12"
    } else {
        "inline-flex items-center gap-2"
    };

    view! {
        <div class=container_class role="status" aria-live="polite">
            <div class=format!(
                "{} animate-spin rounded-full border-theme border-t-accent-primary",
                size.class()
            )></div>
            <span class="sr-only">"Loading..."</span>
            {(!label.is_empty()).then(|| view! {
                <div class="text-sm text-theme-secondary">{label}</div>
            })}
        </div>
    }
}

/// Centered medium spinner
#[component]
pub fn LoadingSpinner(#[prop(default = "Loading...")] label: &'static str) -> impl IntoView {
    view! { <Spinner size=SpinnerSize::Medium label=label centered=true /> }
}
