//! Server-provided resource schema
//!
//! The admin panel renders every backend resource from a metadata descriptor
//! instead of per-resource markup. Type tags arrive as free-form strings and
//! are resolved once per fetch into a closed [`FieldKind`] union; rendering
//! dispatches on the tag from then on.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Actions the backend allows on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    View,
    Create,
    Edit,
    Delete,
    /// Capability strings this client does not know; carried but never gated on
    #[serde(other)]
    Unknown,
}

/// Closed set of field value shapes the table knows how to format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Boolean,
    Timestamp,
    Json,
}

impl FieldKind {
    /// Resolve a server type tag. Unrecognized tags fall back to text.
    pub fn from_type_tag(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        match tag.as_str() {
            "string" | "text" | "email" | "url" | "slug" => FieldKind::Text,
            "number" | "integer" | "int" | "float" | "decimal" => FieldKind::Number,
            "boolean" | "bool" => FieldKind::Boolean,
            "json" | "object" | "array" => FieldKind::Json,
            _ if tag.contains("time") || tag.contains("date") => FieldKind::Timestamp,
            _ => FieldKind::Text,
        }
    }
}

fn default_editable() -> bool {
    true
}

/// One field as described by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_tag: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_editable")]
    pub editable: bool,
}

/// A field descriptor with its type tag resolved
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub editable: bool,
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

impl FieldDescriptor {
    pub fn resolve(&self) -> ResolvedField {
        ResolvedField {
            name: self.name.clone(),
            label: self
                .label
                .clone()
                .unwrap_or_else(|| capitalize(&self.name)),
            kind: FieldKind::from_type_tag(&self.type_tag),
            required: self.required,
            editable: self.editable,
        }
    }
}

/// Schema for one admin-managed resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetadata {
    pub name: String,
    #[serde(default)]
    pub plural_name: String,
    #[serde(default)]
    pub capabilities: HashSet<Capability>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub search_fields: Vec<String>,
    #[serde(default)]
    pub display_fields: Vec<String>,
}

impl ResourceMetadata {
    /// The response key rows arrive under
    pub fn plural_key(&self) -> String {
        if self.plural_name.is_empty() {
            format!("{}s", self.name)
        } else {
            self.plural_name.clone()
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Resolve every field's type tag, once per fetch
    pub fn resolve_fields(&self) -> HashMap<String, ResolvedField> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.resolve()))
            .collect()
    }
}
