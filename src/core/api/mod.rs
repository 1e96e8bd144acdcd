//! Feature data layer
//!
//! Thin, typed wrappers over [`ApiClient`](super::client::ApiClient) for each
//! area of the portal. They return plain data; rendering lives in `ui`.
//! Course, grade and attendance records are backend-defined and passed
//! through as JSON.

mod activity;
mod admin;
mod alerts;
mod faculty;
mod profile;
mod student;

pub use activity::ActivityApi;
pub use admin::{AdminApi, AdminStats, Degraded, NewUser};
pub use alerts::{Alert, AlertSeverity, AlertsApi};
pub use faculty::FacultyApi;
pub use profile::{ProfileApi, ProfileUpdate};
pub use student::{StudentApi, StudentDashboard};

/// Opaque backend record
pub type Record = serde_json::Value;

/// Accept either a bare JSON array or an `{ "<key>": [...] }` envelope
pub(crate) fn unwrap_list<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
    key: &str,
) -> Result<Vec<T>, super::error::ApiError> {
    let list = match value {
        serde_json::Value::Object(mut map) => map
            .remove(key)
            .or_else(|| map.remove("data"))
            .or_else(|| map.remove("results"))
            .unwrap_or(serde_json::Value::Array(Vec::new())),
        other => other,
    };
    serde_json::from_value(list).map_err(|e| super::error::ApiError::Decode(e.to_string()))
}

/// Percent-encode an id for use as one path segment
pub(crate) fn segment(id: &str) -> String {
    // byte_serialize writes spaces as '+', which a path would keep literally
    url::form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_list_bare_array() {
        let list: Vec<Record> = unwrap_list(json!([1, 2]), "courses").unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_unwrap_list_envelopes() {
        let list: Vec<Record> = unwrap_list(json!({"courses": [1]}), "courses").unwrap();
        assert_eq!(list.len(), 1);

        let list: Vec<Record> = unwrap_list(json!({"data": [1, 2, 3]}), "courses").unwrap();
        assert_eq!(list.len(), 3);

        let list: Vec<Record> = unwrap_list(json!({"total": 0}), "courses").unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_segment_escapes_path_delimiters() {
        assert_eq!(segment("CS101"), "CS101");
        assert_eq!(segment("a/b?c#d"), "a%2Fb%3Fc%23d");
        assert_eq!(segment("../admin"), "..%2Fadmin");
        assert_eq!(segment("fall 2025+"), "fall%202025%2B");
    }
}
