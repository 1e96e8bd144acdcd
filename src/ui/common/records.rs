//! Tables over backend-defined JSON records

use leptos::prelude::*;

use crate::core::api::Record;

/// Display text for the first of `keys` present in `record`
pub fn field_text(record: &Record, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| record.get(*key).filter(|v| !v.is_null()))
        .map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| "—".to_string())
}

/// One table column: a header and the record keys it may be read from
#[derive(Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub keys: &'static [&'static str],
}

impl Column {
    pub const fn new(header: &'static str, keys: &'static [&'static str]) -> Self {
        Self { header, keys }
    }
}

#[component]
pub fn RecordTable(
    columns: &'static [Column],
    records: Vec<Record>,
    #[prop(default = "Nothing to show yet.")] empty: &'static str,
) -> impl IntoView {
    if records.is_empty() {
        return view! { <p class="text-sm text-theme-tertiary py-4">{empty}</p> }.into_any();
    }

    view! {
        <div class="overflow-x-auto">
            <table class="w-full text-sm text-left">
                <thead class="text-xs uppercase text-theme-tertiary border-b border-theme">
                    <tr>
                        {columns.iter().map(|c| view! { <th class="px-3 py-2">{c.header}</th> }).collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {records.into_iter().map(|record| view! {
                        <tr class="border-b border-theme last:border-0">
                            {columns.iter().map(|c| view! {
                                <td class="px-3 py-2 text-theme-primary">{field_text(&record, c.keys)}</td>
                            }).collect_view()}
                        </tr>
                    }).collect_view()}
                </tbody>
            </table>
        </div>
    }
    .into_any()
}
