//! Profile page
//!
//! Shows the signed-in account, lets the user edit contact details for their
//! role area and upload a profile photo.

use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::core::api::{ProfileApi, ProfileUpdate, Record};
use crate::core::guard::LOGIN_PATH;
use crate::core::session::UserRecord;
use crate::ui::auth::{UserAvatar, use_auth_context};
use crate::ui::common::{ErrorMessage, ErrorMessageStatic, LoadingSpinner, SuccessMessage};
use crate::ui::icon::{Icon, icons};
use crate::ui::layout::{PortalLayout, Section};

/// Photos above this size are rejected before upload
const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

fn text_field(profile: &Record, key: &str) -> String {
    profile
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Only fields that differ from the loaded profile are sent
fn profile_changes(original: &Record, edited: &[(&'static str, String)]) -> ProfileUpdate {
    let changed = |key: &str| {
        edited
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| *v != text_field(original, key))
    };
    ProfileUpdate {
        email: changed("email"),
        first_name: changed("first_name"),
        last_name: changed("last_name"),
        phone: changed("phone"),
        bio: changed("bio"),
    }
}

#[cfg(not(feature = "ssr"))]
async fn read_selected_file(
    input: web_sys::HtmlInputElement,
) -> Result<Option<(String, String, Vec<u8>)>, String> {
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Could not read {}: {:?}", file.name(), e))?;
    let data = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(Some((file.name(), file.type_(), data)))
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth_context();

    view! {
        <PortalLayout title="My Profile">
            {move || match auth.user() {
                Some(user) => view! { <ProfileDetails user /> }.into_any(),
                None => view! { <LoadingSpinner /> }.into_any(),
            }}
        </PortalLayout>
    }
}

#[component]
fn ProfileDetails(user: UserRecord) -> impl IntoView {
    let auth = use_auth_context();
    let role = user.role;

    let profile = LocalResource::new(move || {
        let client = auth.client();
        async move {
            ProfileApi::new(&client, role)
                .profile()
                .await
                .inspect_err(|e| {
                    auth.report(e);
                })
        }
    });

    let handle_logout = move |_| {
        spawn_local(async move {
            auth.logout().await;
            let navigate = use_navigate();
            navigate(LOGIN_PATH, Default::default());
        });
    };

    let user_for_card = user.clone();
    let user_for_form = user.clone();
    let user_for_photo = user.clone();

    view! {
        <div class="max-w-3xl space-y-6">
            <div class="flex items-center gap-4">
                <UserAvatar user=user_for_card size=64 />
                <div>
                    <p class="text-xl font-semibold text-theme-primary">{user.username.clone()}</p>
                    <p class="text-sm text-theme-secondary">{user.email.clone()}</p>
                    <span class="inline-block mt-1 px-2 py-0.5 text-xs rounded-full bg-accent-primary/10 text-accent-primary">
                        {role.display_name()}
                    </span>
                </div>
            </div>

            {move || match profile.get() {
                None => view! { <LoadingSpinner label="Loading profile..." /> }.into_any(),
                Some(Err(e)) => view! { <ErrorMessageStatic message=e.user_message() /> }.into_any(),
                Some(Ok(record)) => view! {
                    <ProfileForm user=user_for_form.clone() record on_saved=Callback::new(move |_| profile.refetch()) />
                }.into_any(),
            }}

            <PhotoUpload user=user_for_photo />

            <section class="bg-red-50 dark:bg-red-900/10 rounded-xl p-6 border border-red-200 dark:border-red-800">
                <div class="flex items-center justify-between">
                    <div>
                        <p class="text-sm font-medium text-theme-primary">"Sign Out"</p>
                        <p class="text-xs text-theme-tertiary">"Sign out of your account on this device"</p>
                    </div>
                    <button
                        class="flex items-center gap-2 px-4 py-2 text-sm font-medium text-red-600 border border-red-300
                               hover:bg-red-100 dark:hover:bg-red-900/30 rounded-lg transition-colors"
                        on:click=handle_logout
                    >
                        <Icon name=icons::LOGOUT class="w-4 h-4" />
                        "Sign Out"
                    </button>
                </div>
            </section>
        </div>
    }
}

#[component]
fn ProfileForm(user: UserRecord, record: Record, on_saved: Callback<()>) -> impl IntoView {
    let auth = use_auth_context();
    let role = user.role;
    let original = StoredValue::new(record.clone());

    let email = RwSignal::new({
        let stored = text_field(&record, "email");
        if stored.is_empty() { user.email.clone() } else { stored }
    });
    let first_name = RwSignal::new(text_field(&record, "first_name"));
    let last_name = RwSignal::new(text_field(&record, "last_name"));
    let phone = RwSignal::new(text_field(&record, "phone"));
    let bio = RwSignal::new(text_field(&record, "bio"));

    let error = RwSignal::new(None::<String>);
    let success = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let edited = [
            ("email", email.get()),
            ("first_name", first_name.get()),
            ("last_name", last_name.get()),
            ("phone", phone.get()),
            ("bio", bio.get()),
        ];
        let changes = original.with_value(|o| profile_changes(o, &edited));
        if changes.is_empty() {
            success.set(Some("Nothing to save".to_string()));
            return;
        }

        saving.set(true);
        error.set(None);
        success.set(None);
        spawn_local(async move {
            let client = auth.client();
            match ProfileApi::new(&client, role).update(&changes).await {
                Ok(_) => {
                    success.set(Some("Profile updated".to_string()));
                    on_saved.run(());
                }
                Err(e) => error.set(Some(auth.report(&e))),
            }
            saving.set(false);
        });
    };

    let field = move |label: &'static str, input_type: &'static str, value: RwSignal<String>| {
        view! {
            <label class="block">
                <span class="block text-sm font-medium text-theme-secondary mb-1">{label}</span>
                <input
                    type=input_type
                    class="w-full px-3 py-2 bg-theme-primary border border-theme rounded-lg
                           text-theme-primary focus:outline-none focus:ring-2 focus:ring-accent-primary"
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
            </label>
        }
    };

    view! {
        <Section title="Contact Details">
            <form on:submit=on_submit class="space-y-4">
                <ErrorMessage error=error />
                <SuccessMessage message=success />
                <div class="grid gap-4 sm:grid-cols-2">
                    {field("First name", "text", first_name)}
                    {field("Last name", "text", last_name)}
                    {field("Email", "email", email)}
                    {field("Phone", "tel", phone)}
                </div>
                <label class="block">
                    <span class="block text-sm font-medium text-theme-secondary mb-1">"Bio"</span>
                    <textarea
                        rows="3"
                        class="w-full px-3 py-2 bg-theme-primary border border-theme rounded-lg text-theme-primary"
                        prop:value=move || bio.get()
                        on:input=move |ev| bio.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <button
                    type="submit"
                    class="px-4 py-2 text-sm font-medium text-white bg-accent-primary hover:bg-accent-primary-hover rounded-lg disabled:opacity-50"
                    disabled=move || saving.get()
                >
                    {move || if saving.get() { "Saving..." } else { "Save Changes" }}
                </button>
            </form>
        </Section>
    }
}

#[component]
fn PhotoUpload(user: UserRecord) -> impl IntoView {
    let auth = use_auth_context();
    let role = user.role;
    let input_ref = NodeRef::<html::Input>::new();
    let error = RwSignal::new(None::<String>);
    let success = RwSignal::new(None::<String>);
    let uploading = RwSignal::new(false);

    let on_upload = move |_| {
        error.set(None);
        success.set(None);

        #[cfg(not(feature = "ssr"))]
        {
            let Some(input) = input_ref.get() else {
                return;
            };
            uploading.set(true);
            spawn_local(async move {
                let selected = read_selected_file(input).await;
                match selected {
                    Ok(None) => error.set(Some("Choose a photo first".to_string())),
                    Ok(Some((_, _, data))) if data.len() > MAX_PHOTO_BYTES => {
                        error.set(Some("Photos must be 5 MB or smaller".to_string()))
                    }
                    Ok(Some((name, content_type, data))) => {
                        let client = auth.client();
                        match ProfileApi::new(&client, role)
                            .upload_photo(&name, &content_type, data)
                            .await
                        {
                            Ok(_) => success.set(Some("Photo uploaded".to_string())),
                            Err(e) => error.set(Some(auth.report(&e))),
                        }
                    }
                    Err(message) => error.set(Some(message)),
                }
                uploading.set(false);
            });
        }
        #[cfg(feature = "ssr")]
        let _ = (auth, role, input_ref, MAX_PHOTO_BYTES);
    };

    view! {
        <Section title="Profile Photo">
            <div class="space-y-3">
                <ErrorMessage error=error />
                <SuccessMessage message=success />
                <div class="flex items-center gap-3">
                    <input
                        node_ref=input_ref
                        type="file"
                        accept="image/*"
                        class="text-sm text-theme-secondary"
                    />
                    <button
                        class="flex items-center gap-2 px-4 py-2 text-sm font-medium border border-theme text-theme-primary
                               hover:bg-theme-tertiary rounded-lg disabled:opacity-50"
                        disabled=move || uploading.get()
                        on:click=on_upload
                    >
                        <Icon name=icons::UPLOAD class="w-4 h-4" />
                        {move || if uploading.get() { "Uploading..." } else { "Upload" }}
                    </button>
                </div>
            </div>
        </Section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_changes_only_sends_edited_fields() {
        let original = json!({"email": "a@uni.edu", "first_name": "Ada", "phone": null});
        let edited = [
            ("email", "a@uni.edu".to_string()),
            ("first_name", " Ada ".to_string()),
            ("last_name", "Lovelace".to_string()),
            ("phone", String::new()),
            ("bio", String::new()),
        ];

        let changes = profile_changes(&original, &edited);
        assert_eq!(changes.last_name.as_deref(), Some("Lovelace"));
        assert!(changes.email.is_none());
        assert!(changes.first_name.is_none());
        assert!(changes.phone.is_none());
        assert!(changes.bio.is_none());
    }

    #[test]
    fn test_profile_changes_empty_when_untouched() {
        let original = json!({"bio": "Hello"});
        let edited = [("bio", "Hello".to_string())];
        assert!(profile_changes(&original, &edited).is_empty());
    }
}
