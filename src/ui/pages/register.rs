use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::core::Registration;
use crate::ui::auth::RegisterForm;
use crate::ui::common::SuccessMessage;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let confirmation = RwSignal::new(None::<String>);

    let on_success = move |registration: Registration| match registration {
        Registration::SignedIn(session) => {
            let navigate = use_navigate();
            navigate(session.role().dashboard_path(), Default::default());
        }
        Registration::Confirmation(message) => confirmation.set(Some(message)),
    };

    let on_login_click = move |_| {
        let navigate = use_navigate();
        navigate("/login", Default::default());
    };

    view! {
        <div class="min-h-screen bg-theme-primary flex items-center justify-center p-4">
            <div class="w-full max-w-md bg-theme-primary rounded-xl shadow-lg p-6 border border-theme">
                <Show
                    when=move || confirmation.get().is_some()
                    fallback=move || view! {
                        <RegisterForm
                            on_success=Callback::new(on_success)
                            on_login_click=Callback::new(on_login_click)
                        />
                    }
                >
                    <div class="space-y-4 text-center">
                        <SuccessMessage message=confirmation />
                        <A href="/login" attr:class="text-accent-primary hover:text-accent-primary-hover font-medium">
                            "Continue to sign in"
                        </A>
                    </div>
                </Show>
            </div>
        </div>
    }
}
