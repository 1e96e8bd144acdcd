//! Admin dashboard: system statistics and user management

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::core::api::{AdminApi, AdminStats, Degraded, NewUser};
use crate::core::session::Role;
use crate::ui::auth::use_auth_context;
use crate::ui::common::{
    Column, ErrorMessage, ErrorMessageStatic, LoadingSpinner, SuccessMessage,
    WarningMessageStatic, field_text,
};
use crate::ui::icon::{Icon, icons};
use crate::ui::layout::{PortalLayout, Section};

const USER_COLUMNS: &[Column] = &[
    Column::new("Username", &["username"]),
    Column::new("Email", &["email"]),
    Column::new("Role", &["role"]),
];

#[component]
fn StatCard(label: &'static str, value: u64) -> impl IntoView {
    view! {
        <div class="bg-theme-secondary rounded-xl border border-theme p-5">
            <p class="text-sm text-theme-tertiary">{label}</p>
            <p class="text-3xl font-bold text-theme-primary mt-1">{value}</p>
        </div>
    }
}

#[component]
fn StatsOverview(stats: Degraded<AdminStats>) -> impl IntoView {
    let warning = stats.cause.as_ref().map(|cause| {
        format!(
            "Live statistics are unavailable ({}). Showing placeholder values.",
            cause.user_message()
        )
    });
    let AdminStats {
        total_students,
        total_faculty,
        total_courses,
        active_alerts,
    } = stats.value;

    view! {
        <div class="space-y-3">
            {warning.map(|message| view! { <WarningMessageStatic message /> })}
            <div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-4">
                <StatCard label="Students" value=total_students />
                <StatCard label="Faculty" value=total_faculty />
                <StatCard label="Courses" value=total_courses />
                <StatCard label="Active Alerts" value=active_alerts />
            </div>
        </div>
    }
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let auth = use_auth_context();

    let stats = LocalResource::new(move || {
        let client = auth.client();
        async move {
            AdminApi::new(&client)
                .stats_or_placeholder()
                .await
                .inspect_err(|e| {
                    auth.report(e);
                })
        }
    });

    let users = LocalResource::new(move || {
        let client = auth.client();
        async move {
            AdminApi::new(&client).users().await.inspect_err(|e| {
                auth.report(e);
            })
        }
    });

    let action_error = RwSignal::new(None::<String>);

    let delete_user = move |user_id: String| {
        action_error.set(None);
        spawn_local(async move {
            let client = auth.client();
            match AdminApi::new(&client).delete_user(&user_id).await {
                Ok(()) => users.refetch(),
                Err(e) => action_error.set(Some(auth.report(&e))),
            }
        });
    };

    view! {
        <PortalLayout title="Admin Dashboard">
            <div class="space-y-6">
                {move || match stats.get() {
                    None => view! { <LoadingSpinner label="Loading statistics..." /> }.into_any(),
                    Some(Err(e)) => view! { <ErrorMessageStatic message=e.user_message() /> }.into_any(),
                    Some(Ok(stats)) => view! { <StatsOverview stats /> }.into_any(),
                }}

                <div class="grid gap-6 lg:grid-cols-3">
                    <div class="lg:col-span-2">
                        <Section title="Users">
                            <ErrorMessage error=action_error />
                            {move || match users.get() {
                                None => view! { <LoadingSpinner label="Loading users..." /> }.into_any(),
                                Some(Err(e)) => view! { <ErrorMessageStatic message=e.user_message() /> }.into_any(),
                                Some(Ok(list)) if list.is_empty() => view! {
                                    <p class="text-sm text-theme-tertiary py-4">"No users yet."</p>
                                }.into_any(),
                                Some(Ok(list)) => view! {
                                    <table class="w-full text-sm text-left">
                                        <thead class="text-xs uppercase text-theme-tertiary border-b border-theme">
                                            <tr>
                                                {USER_COLUMNS.iter().map(|c| view! { <th class="px-3 py-2">{c.header}</th> }).collect_view()}
                                                <th class="px-3 py-2"></th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {list.into_iter().map(|user| {
                                                let id = field_text(&user, &["id", "user_id"]);
                                                view! {
                                                    <tr class="border-b border-theme last:border-0">
                                                        {USER_COLUMNS.iter().map(|c| view! {
                                                            <td class="px-3 py-2 text-theme-primary">{field_text(&user, c.keys)}</td>
                                                        }).collect_view()}
                                                        <td class="px-3 py-2 text-right">
                                                            <button
                                                                class="p-1.5 text-theme-tertiary hover:text-red-500 rounded"
                                                                title="Delete user"
                                                                on:click=move |_| delete_user(id.clone())
                                                            >
                                                                <Icon name=icons::TRASH class="w-4 h-4" />
                                                            </button>
                                                        </td>
                                                    </tr>
                                                }
                                            }).collect_view()}
                                        </tbody>
                                    </table>
                                }.into_any(),
                            }}
                        </Section>
                    </div>

                    <Section title="Create User">
                        <CreateUserForm on_created=Callback::new(move |_| users.refetch()) />
                    </Section>
                </div>
            </div>
        </PortalLayout>
    }
}

#[component]
fn CreateUserForm(on_created: Callback<()>) -> impl IntoView {
    let auth = use_auth_context();

    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let role = RwSignal::new(Role::Student);
    let error = RwSignal::new(None::<String>);
    let success = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let user = NewUser {
            username: username.get().trim().to_string(),
            email: email.get().trim().to_string(),
            password: password.get(),
            role: role.get(),
            extra: Default::default(),
        };
        if user.username.is_empty() || user.email.is_empty() || user.password.is_empty() {
            error.set(Some("Username, email and password are required".to_string()));
            return;
        }

        saving.set(true);
        error.set(None);
        success.set(None);
        spawn_local(async move {
            let client = auth.client();
            match AdminApi::new(&client).create_user(&user).await {
                Ok(_) => {
                    success.set(Some(format!("Created {}", user.username)));
                    username.set(String::new());
                    email.set(String::new());
                    password.set(String::new());
                    on_created.run(());
                }
                Err(e) => error.set(Some(auth.report(&e))),
            }
            saving.set(false);
        });
    };

    let input_class = "w-full px-3 py-2 bg-theme-primary border border-theme rounded-lg text-theme-primary";

    view! {
        <form on:submit=on_submit class="space-y-3">
            <ErrorMessage error=error />
            <SuccessMessage message=success />
            <input type="text" placeholder="Username" class=input_class
                prop:value=move || username.get()
                on:input=move |ev| username.set(event_target_value(&ev)) />
            <input type="email" placeholder="Email" class=input_class
                prop:value=move || email.get()
                on:input=move |ev| email.set(event_target_value(&ev)) />
            <input type="password" placeholder="Initial password" autocomplete="new-password" class=input_class
                prop:value=move || password.get()
                on:input=move |ev| password.set(event_target_value(&ev)) />
            <select class=input_class
                on:change=move |ev| {
                    if let Ok(r) = event_target_value(&ev).parse::<Role>() {
                        role.set(r);
                    }
                }
            >
                {Role::ALL.into_iter().map(|r| view! {
                    <option value=r.as_str() selected=move || role.get() == r>{r.display_name()}</option>
                }).collect_view()}
            </select>
            <button
                type="submit"
                class="w-full flex items-center justify-center gap-2 px-4 py-2 bg-accent-primary hover:bg-accent-primary-hover text-white rounded-lg disabled:opacity-50"
                disabled=move || saving.get()
            >
                <Icon name=icons::PLUS class="w-4 h-4" />
                "Create User"
            </button>
        </form>
    }
}
