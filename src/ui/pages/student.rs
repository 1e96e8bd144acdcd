//! Student dashboard: courses, grades and attendance, plus enrollment

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::core::api::StudentApi;
use crate::ui::auth::use_auth_context;
use crate::ui::common::{Column, ErrorMessage, ErrorMessageStatic, LoadingSpinner, RecordTable, SuccessMessage};
use crate::ui::layout::{PortalLayout, Section};

const COURSE_COLUMNS: &[Column] = &[
    Column::new("Code", &["code", "course_code", "id"]),
    Column::new("Course", &["name", "title"]),
    Column::new("Instructor", &["instructor", "faculty", "teacher"]),
    Column::new("Credits", &["credits"]),
];

const GRADE_COLUMNS: &[Column] = &[
    Column::new("Course", &["course", "course_code", "course_name"]),
    Column::new("Assessment", &["assessment", "type", "name"]),
    Column::new("Grade", &["grade", "score"]),
];

const ATTENDANCE_COLUMNS: &[Column] = &[
    Column::new("Course", &["course", "course_code", "course_name"]),
    Column::new("Date", &["date"]),
    Column::new("Status", &["status", "present"]),
];

#[component]
pub fn StudentDashboardPage() -> impl IntoView {
    let auth = use_auth_context();

    let dashboard = LocalResource::new(move || {
        let client = auth.client();
        async move {
            StudentApi::new(&client)
                .dashboard()
                .await
                .inspect_err(|e| {
                    auth.report(e);
                })
        }
    });

    let course_id = RwSignal::new(String::new());
    let enroll_error = RwSignal::new(None::<String>);
    let enroll_success = RwSignal::new(None::<String>);

    let on_enroll = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let id = course_id.get().trim().to_string();
        if id.is_empty() {
            enroll_error.set(Some("Enter a course code".to_string()));
            return;
        }
        enroll_error.set(None);
        enroll_success.set(None);

        spawn_local(async move {
            let client = auth.client();
            match StudentApi::new(&client).enroll(&id).await {
                Ok(_) => {
                    enroll_success.set(Some(format!("Enrolled in {}", id)));
                    course_id.set(String::new());
                    dashboard.refetch();
                }
                Err(e) => enroll_error.set(Some(auth.report(&e))),
            }
        });
    };

    view! {
        <PortalLayout title="Student Dashboard">
            {move || match dashboard.get() {
                None => view! { <LoadingSpinner label="Loading your courses..." /> }.into_any(),
                Some(Err(e)) => view! { <ErrorMessageStatic message=e.user_message() /> }.into_any(),
                Some(Ok(data)) => view! {
                    <div class="grid gap-6 lg:grid-cols-2">
                        <Section title="My Courses">
                            <RecordTable columns=COURSE_COLUMNS records=data.courses
                                empty="You are not enrolled in any courses." />
                        </Section>
                        <Section title="Grades">
                            <RecordTable columns=GRADE_COLUMNS records=data.grades
                                empty="No grades posted yet." />
                        </Section>
                        <Section title="Attendance">
                            <RecordTable columns=ATTENDANCE_COLUMNS records=data.attendance />
                        </Section>
                    </div>
                }.into_any(),
            }}

            <div class="mt-6 max-w-md">
                <Section title="Enroll in a Course">
                    <form on:submit=on_enroll class="space-y-3">
                        <ErrorMessage error=enroll_error />
                        <SuccessMessage message=enroll_success />
                        <div class="flex gap-2">
                            <input
                                type="text"
                                placeholder="Course code, e.g. CS101"
                                class="flex-1 px-3 py-2 bg-theme-primary border border-theme rounded-lg text-theme-primary"
                                prop:value=move || course_id.get()
                                on:input=move |ev| course_id.set(event_target_value(&ev))
                            />
                            <button
                                type="submit"
                                class="px-4 py-2 bg-accent-primary hover:bg-accent-primary-hover text-white rounded-lg"
                            >
                                "Enroll"
                            </button>
                        </div>
                    </form>
                </Section>
            </div>
        </PortalLayout>
    }
}
