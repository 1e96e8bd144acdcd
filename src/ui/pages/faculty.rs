//! Faculty dashboard: taught courses, grade entry and attendance

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::json;

use crate::core::api::{FacultyApi, Record};
use crate::ui::auth::use_auth_context;
use crate::ui::common::{
    Column, ErrorMessage, ErrorMessageStatic, LoadingSpinner, RecordTable, SuccessMessage,
    field_text,
};
use crate::ui::layout::{PortalLayout, Section};

const COURSE_COLUMNS: &[Column] = &[
    Column::new("Code", &["code", "course_code", "id"]),
    Column::new("Course", &["name", "title"]),
    Column::new("Enrolled", &["enrolled", "student_count"]),
];

const ID_KEYS: &[&str] = &["id", "student_id", "course_id", "code"];

fn record_id(record: &Record) -> String {
    field_text(record, ID_KEYS)
}

/// `{"grades": [{student_id, grade}]}`, skipping students with no grade entered
fn grades_payload(grades: &HashMap<String, String>) -> Record {
    let mut entries: Vec<_> = grades
        .iter()
        .filter(|(_, grade)| !grade.trim().is_empty())
        .map(|(id, grade)| json!({"student_id": id, "grade": grade.trim()}))
        .collect();
    entries.sort_by_key(|e| e["student_id"].as_str().map(str::to_string));
    json!({ "grades": entries })
}

fn attendance_payload(date: &str, present: &HashSet<String>) -> Record {
    let mut ids: Vec<_> = present.iter().cloned().collect();
    ids.sort();
    json!({ "date": date, "present": ids })
}

#[component]
pub fn FacultyDashboardPage() -> impl IntoView {
    let auth = use_auth_context();

    let courses = LocalResource::new(move || {
        let client = auth.client();
        async move {
            FacultyApi::new(&client).courses().await.inspect_err(|e| {
                auth.report(e);
            })
        }
    });

    let selected = RwSignal::new(None::<String>);

    view! {
        <PortalLayout title="Faculty Dashboard">
            <div class="space-y-6">
                <Section title="My Courses">
                    {move || match courses.get() {
                        None => view! { <LoadingSpinner label="Loading courses..." /> }.into_any(),
                        Some(Err(e)) => view! { <ErrorMessageStatic message=e.user_message() /> }.into_any(),
                        Some(Ok(list)) => {
                            let options = list.iter().map(|c| {
                                let id = record_id(c);
                                let label = format!("{} {}", id, field_text(c, &["name", "title"]));
                                view! { <option value=id.clone()>{label}</option> }
                            }).collect_view();
                            view! {
                                <RecordTable columns=COURSE_COLUMNS records=list
                                    empty="You are not teaching any courses." />
                                <label class="block mt-4 text-sm font-medium text-theme-secondary">
                                    "Manage course"
                                    <select
                                        class="mt-1 block w-full px-3 py-2 bg-theme-primary border border-theme rounded-lg text-theme-primary"
                                        on:change=move |ev| {
                                            let value = event_target_value(&ev);
                                            selected.set((!value.is_empty()).then_some(value));
                                        }
                                    >
                                        <option value="">"Select a course"</option>
                                        {options}
                                    </select>
                                </label>
                            }.into_any()
                        }
                    }}
                </Section>

                {move || selected.get().map(|course_id| view! { <CourseRoster course_id /> })}
            </div>
        </PortalLayout>
    }
}

/// Students of one course with grade and attendance entry
#[component]
fn CourseRoster(course_id: String) -> impl IntoView {
    let auth = use_auth_context();
    let course = StoredValue::new(course_id);

    let students = LocalResource::new(move || {
        let client = auth.client();
        let course_id = course.get_value();
        async move {
            FacultyApi::new(&client)
                .course_students(&course_id)
                .await
                .inspect_err(|e| {
                    auth.report(e);
                })
        }
    });

    let grades = RwSignal::new(HashMap::<String, String>::new());
    let present = RwSignal::new(HashSet::<String>::new());
    let date = RwSignal::new(Utc::now().format("%Y-%m-%d").to_string());
    let error = RwSignal::new(None::<String>);
    let success = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);

    let on_submit_grades = move |_| {
        let payload = grades_payload(&grades.get());
        saving.set(true);
        error.set(None);
        success.set(None);
        spawn_local(async move {
            let client = auth.client();
            let course_id = course.get_value();
            match FacultyApi::new(&client).submit_grades(&course_id, &payload).await {
                Ok(_) => success.set(Some("Grades submitted".to_string())),
                Err(e) => error.set(Some(auth.report(&e))),
            }
            saving.set(false);
        });
    };

    let on_record_attendance = move |_| {
        let payload = attendance_payload(&date.get(), &present.get());
        saving.set(true);
        error.set(None);
        success.set(None);
        spawn_local(async move {
            let client = auth.client();
            let course_id = course.get_value();
            match FacultyApi::new(&client)
                .record_attendance(&course_id, &payload)
                .await
            {
                Ok(_) => success.set(Some("Attendance recorded".to_string())),
                Err(e) => error.set(Some(auth.report(&e))),
            }
            saving.set(false);
        });
    };

    view! {
        <Section title="Roster">
            <div class="space-y-4">
                <ErrorMessage error=error />
                <SuccessMessage message=success />

                {move || match students.get() {
                    None => view! { <LoadingSpinner label="Loading students..." /> }.into_any(),
                    Some(Err(e)) => view! { <ErrorMessageStatic message=e.user_message() /> }.into_any(),
                    Some(Ok(list)) if list.is_empty() => view! {
                        <p class="text-sm text-theme-tertiary">"No students enrolled."</p>
                    }.into_any(),
                    Some(Ok(list)) => view! {
                        <table class="w-full text-sm text-left">
                            <thead class="text-xs uppercase text-theme-tertiary border-b border-theme">
                                <tr>
                                    <th class="px-3 py-2">"Student"</th>
                                    <th class="px-3 py-2">"Grade"</th>
                                    <th class="px-3 py-2">"Present"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {list.into_iter().map(|student| {
                                    let id = record_id(&student);
                                    let name = field_text(&student, &["name", "full_name", "username"]);
                                    let grade_id = id.clone();
                                    let input_id = id.clone();
                                    let check_id = id.clone();
                                    let toggle_id = id;
                                    view! {
                                        <tr class="border-b border-theme last:border-0">
                                            <td class="px-3 py-2 text-theme-primary">{name}</td>
                                            <td class="px-3 py-2">
                                                <input
                                                    type="text"
                                                    class="w-20 px-2 py-1 bg-theme-primary border border-theme rounded text-theme-primary"
                                                    prop:value=move || grades.with(|g| g.get(&grade_id).cloned().unwrap_or_default())
                                                    on:input=move |ev| {
                                                        let value = event_target_value(&ev);
                                                        grades.update(|g| {
                                                            g.insert(input_id.clone(), value);
                                                        });
                                                    }
                                                />
                                            </td>
                                            <td class="px-3 py-2">
                                                <input
                                                    type="checkbox"
                                                    prop:checked=move || present.with(|p| p.contains(&check_id))
                                                    on:change=move |_| {
                                                        present.update(|p| {
                                                            if !p.remove(&toggle_id) {
                                                                p.insert(toggle_id.clone());
                                                            }
                                                        });
                                                    }
                                                />
                                            </td>
                                        </tr>
                                    }
                                }).collect_view()}
                            </tbody>
                        </table>
                    }.into_any(),
                }}

                <div class="flex flex-wrap items-center gap-3">
                    <button
                        class="px-4 py-2 bg-accent-primary hover:bg-accent-primary-hover text-white rounded-lg disabled:opacity-50"
                        disabled=move || saving.get()
                        on:click=on_submit_grades
                    >
                        "Submit Grades"
                    </button>
                    <input
                        type="date"
                        class="px-3 py-2 bg-theme-primary border border-theme rounded-lg text-theme-primary"
                        prop:value=move || date.get()
                        on:input=move |ev| date.set(event_target_value(&ev))
                    />
                    <button
                        class="px-4 py-2 border border-theme text-theme-primary hover:bg-theme-tertiary rounded-lg disabled:opacity-50"
                        disabled=move || saving.get()
                        on:click=on_record_attendance
                    >
                        "Record Attendance"
                    </button>
                </div>
            </div>
        </Section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grades_payload_skips_blank_entries() {
        let grades = HashMap::from([
            ("2".to_string(), " B+ ".to_string()),
            ("1".to_string(), "A".to_string()),
            ("3".to_string(), "  ".to_string()),
        ]);

        assert_eq!(
            grades_payload(&grades),
            json!({"grades": [
                {"student_id": "1", "grade": "A"},
                {"student_id": "2", "grade": "B+"},
            ]})
        );
    }

    #[test]
    fn test_attendance_payload_sorted() {
        let present = HashSet::from(["s2".to_string(), "s1".to_string()]);
        assert_eq!(
            attendance_payload("2024-03-01", &present),
            json!({"date": "2024-03-01", "present": ["s1", "s2"]})
        );
    }
}
