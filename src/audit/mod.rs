use crate::model::{AuditLogEntry, AuditLogResult};

/// Selection and formatting helpers over the backend-owned audit trail.
/// Entries arrive newest-first and are never mutated client-side.

pub fn find_entry<'a>(result: &'a AuditLogResult, id: &str) -> Option<&'a AuditLogEntry> {
    result.entries.iter().find(|entry| entry.id == id)
}

/// Turn an action code like UPDATE_MODE into the label "Update Mode".
/// Unknown codes get the same treatment rather than an error.
pub fn format_action(action: &str) -> String {
    action
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render an opaque before/after snapshot for the diff pane. The value is
/// display-only and never replayed against the backend.
pub fn format_value(value: &serde_json::Value) -> String {
    if value.is_null() {
        return "-".to_string();
    }
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(id: &str, action: &str) -> AuditLogEntry {
        AuditLogEntry {
            id: id.to_string(),
            action: action.to_string(),
            resource_type: "waf_policy".to_string(),
            resource_id: "example.com".to_string(),
            user: "ops".to_string(),
            details: String::new(),
            old_value: serde_json::Value::Null,
            new_value: serde_json::Value::Null,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_format_action_known_codes() {
        assert_eq!(format_action("UPDATE_MODE"), "Update Mode");
        assert_eq!(format_action("UPDATE_EXCEPTIONS"), "Update Exceptions");
        assert_eq!(format_action("UPDATE_RULES"), "Update Rules");
        assert_eq!(format_action("APPLY_CONFIGURATION"), "Apply Configuration");
    }

    #[test]
    fn test_format_action_unknown_code_passes_through() {
        assert_eq!(format_action("ROTATE_SECRET"), "Rotate Secret");
        assert_eq!(format_action("reload"), "Reload");
    }

    #[test]
    fn test_find_entry_by_id() {
        let result = AuditLogResult {
            entries: vec![entry("a1", "UPDATE_MODE"), entry("a2", "UPDATE_RULES")],
            total: 2,
        };

        assert_eq!(find_entry(&result, "a2").unwrap().action, "UPDATE_RULES");
        assert!(find_entry(&result, "a3").is_none());
    }

    #[test]
    fn test_format_value_null_and_object() {
        assert_eq!(format_value(&serde_json::Value::Null), "-");

        let value = serde_json::json!({"mode": "On"});
        let rendered = format_value(&value);
        assert!(rendered.contains("\"mode\": \"On\""));
    }
}
