//! Administrative bindings over the record store
//!
//! The admin surface is a thin declarative binding per entity: which
//! columns a listing shows, which fields it can filter on, and which
//! fields a search scans. The CLI drives these generically over
//! JSON-serialized entities; there are no hand-built per-entity screens.

use serde_json::Value;

/// Declarative admin binding for one entity kind
#[derive(Debug, Clone)]
pub struct AdminBinding {
    /// Entity name as used on the CLI
    pub entity: &'static str,
    /// Columns shown by `list`
    pub list_display: &'static [&'static str],
    /// Fields accepted by `--filter key=value`
    pub list_filter: &'static [&'static str],
    /// Fields scanned by `--search`
    pub search_fields: &'static [&'static str],
    /// Fields that administrative edits must never touch
    pub readonly_fields: &'static [&'static str],
}

/// Bindings for every entity kind in the record store
pub const BINDINGS: &[AdminBinding] = &[
    AdminBinding {
        entity: "projects",
        list_display: &["title", "project_type", "completion_date", "featured"],
        list_filter: &["project_type", "featured", "completion_date"],
        search_fields: &["title", "description"],
        readonly_fields: &[],
    },
    AdminBinding {
        entity: "research",
        list_display: &["title", "paper_type", "publication_date", "is_published"],
        list_filter: &["paper_type", "is_published", "publication_date"],
        search_fields: &["title", "abstract", "authors"],
        readonly_fields: &[],
    },
    AdminBinding {
        entity: "team",
        list_display: &["name", "position", "email", "is_active", "display_order"],
        list_filter: &["is_active", "position"],
        search_fields: &["name", "position", "bio"],
        readonly_fields: &[],
    },
    AdminBinding {
        entity: "services",
        list_display: &["title", "display_order", "is_active"],
        list_filter: &["is_active"],
        search_fields: &["title", "description"],
        readonly_fields: &[],
    },
    AdminBinding {
        entity: "testimonials",
        list_display: &["client_name", "client_company", "rating", "is_approved"],
        list_filter: &["rating", "is_approved", "created_at"],
        search_fields: &["client_name", "content"],
        readonly_fields: &[],
    },
    AdminBinding {
        entity: "messages",
        list_display: &["name", "email", "subject", "status", "received_at"],
        list_filter: &["status", "service_id", "received_at"],
        search_fields: &["name", "email", "subject", "body"],
        readonly_fields: &["received_at"],
    },
    AdminBinding {
        entity: "pricing",
        list_display: &[
            "title",
            "package_type",
            "price",
            "currency",
            "is_featured",
            "is_active",
        ],
        list_filter: &["package_type", "is_featured", "is_active"],
        search_fields: &["title", "features"],
        readonly_fields: &[],
    },
];

/// Look up a binding by entity name
pub fn binding(entity: &str) -> Option<&'static AdminBinding> {
    BINDINGS.iter().find(|b| b.entity == entity)
}

/// All bound entity names
pub fn entity_names() -> Vec<&'static str> {
    BINDINGS.iter().map(|b| b.entity).collect()
}

/// Case-insensitive substring search across the binding's search fields
pub fn matches_search(row: &Value, binding: &AdminBinding, term: &str) -> bool {
    let needle = term.to_lowercase();
    binding.search_fields.iter().any(|field| {
        row.get(*field)
            .map(|value| value_to_display(value).to_lowercase().contains(&needle))
            .unwrap_or(false)
    })
}

/// Compare a row field against a filter value by display form
pub fn matches_filter(row: &Value, field: &str, expected: &str) -> bool {
    row.get(field)
        .map(|value| value_to_display(value) == expected)
        .unwrap_or(false)
}

/// Project a row onto the binding's display columns
pub fn display_row(row: &Value, binding: &AdminBinding) -> Vec<String> {
    binding
        .list_display
        .iter()
        .map(|field| {
            row.get(*field)
                .map(value_to_display)
                .unwrap_or_default()
        })
        .collect()
}

fn value_to_display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_entity_is_bound() {
        let names = entity_names();
        for entity in [
            "projects",
            "research",
            "team",
            "services",
            "testimonials",
            "messages",
            "pricing",
        ] {
            assert!(names.contains(&entity), "missing binding for '{entity}'");
        }
        assert!(binding("messages").is_some());
        assert!(binding("invoices").is_none());
    }

    #[test]
    fn test_received_at_is_readonly_for_messages() {
        let messages = binding("messages").unwrap();
        assert!(messages.readonly_fields.contains(&"received_at"));
    }

    #[test]
    fn test_search_scans_bound_fields_only() {
        let projects = binding("projects").unwrap();
        let row = json!({
            "title": "Harbor Logistics Portal",
            "description": "Realtime cargo tracking",
            "slug": "harbor-logistics"
        });

        assert!(matches_search(&row, projects, "cargo"));
        assert!(matches_search(&row, projects, "HARBOR"));
        // slug is not a search field
        assert!(!matches_search(&row, projects, "harbor-logistics"));
    }

    #[test]
    fn test_filter_compares_display_form() {
        let row = json!({"status": "new", "rating": 5, "is_active": true});

        assert!(matches_filter(&row, "status", "new"));
        assert!(matches_filter(&row, "rating", "5"));
        assert!(matches_filter(&row, "is_active", "true"));
        assert!(!matches_filter(&row, "status", "read"));
        assert!(!matches_filter(&row, "missing", "x"));
    }

    #[test]
    fn test_display_row_projects_columns() {
        let messages = binding("messages").unwrap();
        let row = json!({
            "name": "Juma",
            "email": "juma@example.com",
            "subject": "Quote",
            "status": "new",
            "received_at": "2026-08-01T08:30:00Z",
            "body": "hidden from listing"
        });

        let display = display_row(&row, messages);
        assert_eq!(
            display,
            vec![
                "Juma",
                "juma@example.com",
                "Quote",
                "new",
                "2026-08-01T08:30:00Z"
            ]
        );
    }
}
