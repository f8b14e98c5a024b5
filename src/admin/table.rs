//! Metadata-driven table rendering
//!
//! One renderer for every backend resource: columns come from the metadata's
//! display fields, cell formatting dispatches on the resolved field kind, and
//! filtering runs over the metadata's search fields. No per-resource
//! branching anywhere.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::metadata::{Capability, FieldKind, ResolvedField, ResourceMetadata};

/// Human-readable distance between `at` and `now`.
///
/// The single authoritative implementation; every view formats timestamps
/// through this.
pub fn format_relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(at);
    let seconds = delta.num_seconds();

    if seconds < 0 {
        // server clock ahead of ours; render as current
        return "just now".to_string();
    }
    if seconds < 60 {
        return "just now".to_string();
    }
    let minutes = delta.num_minutes();
    if minutes < 60 {
        return format!("{} minute{} ago", minutes, if minutes == 1 { "" } else { "s" });
    }
    let hours = delta.num_hours();
    if hours < 24 {
        return format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" });
    }
    let days = delta.num_days();
    if days <= 30 {
        return format!("{} day{} ago", days, if days == 1 { "" } else { "s" });
    }
    at.format("%Y-%m-%d").to_string()
}

/// A single row, as returned by the admin rows endpoint
pub type Row = Map<String, Value>;

/// Renders a CRUD grid for one resource from its metadata
#[derive(Debug)]
pub struct ResourceTable {
    metadata: ResourceMetadata,
    fields: HashMap<String, ResolvedField>,
    rows: Vec<Row>,
}

impl ResourceTable {
    pub fn new(metadata: ResourceMetadata, rows: Vec<Row>) -> Self {
        let fields = metadata.resolve_fields();
        Self {
            metadata,
            fields,
            rows,
        }
    }

    pub fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    fn field_kind(&self, name: &str) -> FieldKind {
        self.fields
            .get(name)
            .map(|f| f.kind)
            .unwrap_or(FieldKind::Text)
    }

    /// Column headers: the labels of the display fields, in order, no matter
    /// what other keys the rows carry
    pub fn headers(&self) -> Vec<String> {
        self.metadata
            .display_fields
            .iter()
            .map(|name| {
                self.fields
                    .get(name)
                    .map(|f| f.label.clone())
                    .unwrap_or_else(|| name.clone())
            })
            .collect()
    }

    fn format_value(&self, kind: FieldKind, value: &Value, now: DateTime<Utc>) -> String {
        match value {
            Value::Null => "-".to_string(),
            // objects and arrays are JSON-stringified regardless of the
            // declared kind
            Value::Object(_) | Value::Array(_) => value.to_string(),
            _ => match kind {
                FieldKind::Timestamp => match value
                    .as_str()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                {
                    Some(parsed) => format_relative_time(parsed.with_timezone(&Utc), now),
                    None => coerce(value),
                },
                FieldKind::Boolean => match value.as_bool() {
                    Some(true) => "Yes".to_string(),
                    Some(false) => "No".to_string(),
                    None => coerce(value),
                },
                FieldKind::Json => value.to_string(),
                FieldKind::Text | FieldKind::Number => coerce(value),
            },
        }
    }

    /// Format one cell for display
    pub fn cell(&self, row: &Row, field_name: &str) -> String {
        self.cell_at(row, field_name, Utc::now())
    }

    /// Format one cell against an explicit clock
    pub fn cell_at(&self, row: &Row, field_name: &str, now: DateTime<Utc>) -> String {
        let value = row.get(field_name).unwrap_or(&Value::Null);
        self.format_value(self.field_kind(field_name), value, now)
    }

    /// One formatted line per display field
    pub fn render_row(&self, row: &Row) -> Vec<String> {
        self.render_row_at(row, Utc::now())
    }

    pub fn render_row_at(&self, row: &Row, now: DateTime<Utc>) -> Vec<String> {
        self.metadata
            .display_fields
            .iter()
            .map(|name| self.cell_at(row, name, now))
            .collect()
    }

    /// Rows whose search fields contain the query, case-insensitively. An
    /// empty query matches everything.
    pub fn filter(&self, query: &str) -> Vec<&Row> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.rows.iter().collect();
        }
        self.rows
            .iter()
            .filter(|row| {
                self.metadata.search_fields.iter().any(|field| {
                    row.get(field)
                        .map(|value| coerce(value).to_lowercase().contains(&query))
                        .unwrap_or(false)
                })
            })
            .collect()
    }

    /// Row-level action buttons the capabilities allow
    pub fn actions(&self) -> Vec<Capability> {
        [Capability::View, Capability::Edit, Capability::Delete]
            .into_iter()
            .filter(|cap| self.metadata.can(*cap))
            .collect()
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.metadata.can(capability)
    }
}

fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn table() -> ResourceTable {
        let metadata: ResourceMetadata = serde_json::from_value(json!({
            "name": "project",
            "pluralName": "projects",
            "capabilities": ["view", "delete"],
            "fields": [
                {"name": "name", "type": "string", "label": "Name"},
                {"name": "status", "type": "string", "label": "Status"},
                {"name": "archived", "type": "boolean", "label": "Archived"},
                {"name": "createdAt", "type": "datetime", "label": "Created"},
                {"name": "settings", "type": "json", "label": "Settings"}
            ],
            "searchFields": ["name", "status"],
            "displayFields": ["name", "status"]
        }))
        .unwrap();

        let rows: Vec<Row> = vec![
            serde_json::from_value(json!({
                "name": "Apollo", "status": "active", "archived": false,
                "createdAt": "2026-08-30T11:58:00Z", "settings": {"tier": 2},
                "internalOnly": "never shown"
            }))
            .unwrap(),
            serde_json::from_value(json!({
                "name": "Borealis", "status": "completed", "archived": true
            }))
            .unwrap(),
        ];

        ResourceTable::new(metadata, rows)
    }

    #[test]
    fn headers_come_from_display_fields_only() {
        assert_eq!(table().headers(), vec!["Name", "Status"]);
    }

    #[test]
    fn cells_format_by_kind() {
        let table = table();
        let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        let row = &table.rows()[0];

        assert_eq!(table.cell_at(row, "name", now), "Apollo");
        assert_eq!(table.cell_at(row, "archived", now), "No");
        assert_eq!(table.cell_at(row, "createdAt", now), "2 minutes ago");
        assert_eq!(table.cell_at(row, "settings", now), "{\"tier\":2}");
        assert_eq!(table.cell_at(row, "missing", now), "-");
    }

    #[test]
    fn filter_is_case_insensitive_over_search_fields() {
        let table = table();
        assert_eq!(table.filter("").len(), 2);
        assert_eq!(table.filter("APOLLO").len(), 1);
        assert_eq!(table.filter("completed").len(), 1);
        // internalOnly is not a search field
        assert_eq!(table.filter("never shown").len(), 0);
    }

    #[test]
    fn actions_are_capability_gated() {
        assert_eq!(table().actions(), vec![Capability::View, Capability::Delete]);
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        let at = |secs: i64| now - chrono::Duration::seconds(secs);

        assert_eq!(format_relative_time(at(5), now), "just now");
        assert_eq!(format_relative_time(at(90), now), "1 minute ago");
        assert_eq!(format_relative_time(at(60 * 45), now), "45 minutes ago");
        assert_eq!(format_relative_time(at(3600 * 3), now), "3 hours ago");
        assert_eq!(format_relative_time(at(86400 * 2), now), "2 days ago");
        assert_eq!(format_relative_time(at(86400 * 60), now), "2026-07-01");
        // future timestamps render as current
        assert_eq!(format_relative_time(now + chrono::Duration::seconds(30), now), "just now");
    }
}
