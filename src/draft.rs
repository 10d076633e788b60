//! The in-progress student record being created or edited. All edits go
//! through named-field patches so a slow image read committing late can never
//! clobber field edits made while it was in flight.

use anyhow::{anyhow, Context};
use base64::Engine;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::model::{field, FieldKind, StudentRecord, FIELDS};

pub struct Draft {
    fields: Map<String, Value>,
}

impl Draft {
    /// Blank draft. Every registry field gets a defined default: empty string
    /// for text-like kinds, false for section flags.
    pub fn new() -> Self {
        let mut fields = Map::with_capacity(FIELDS.len());
        for spec in FIELDS {
            let default = match spec.kind {
                FieldKind::Bool => Value::Bool(false),
                _ => Value::String(String::new()),
            };
            fields.insert(spec.name.to_string(), default);
        }
        Draft { fields }
    }

    /// Draft seeded from an existing record for editing. The record's `id`
    /// stays out of the draft; the caller tracks the editing context.
    pub fn seeded(record: &StudentRecord) -> anyhow::Result<Self> {
        let value = serde_json::to_value(record).context("serialize seed record")?;
        let obj = value
            .as_object()
            .ok_or_else(|| anyhow!("seed record is not an object"))?;
        let mut draft = Draft::new();
        for spec in FIELDS {
            if let Some(v) = obj.get(spec.name) {
                draft.fields.insert(spec.name.to_string(), v.clone());
            }
        }
        Ok(draft)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Replace one text-like field. Section flags go through
    /// `toggle_section`; unknown names are rejected.
    pub fn set_field(&mut self, name: &str, value: &str) -> anyhow::Result<()> {
        let spec = field(name).ok_or_else(|| anyhow!("unknown field: {}", name))?;
        if spec.kind == FieldKind::Bool {
            return Err(anyhow!("{} is a section flag, use toggleSection", name));
        }
        self.fields
            .insert(name.to_string(), Value::String(value.to_string()));
        Ok(())
    }

    /// Set one of the four academic section flags. The section's sub-fields
    /// stay resident in the draft either way; toggling a section back on
    /// restores whatever was typed before.
    pub fn toggle_section(&mut self, flag: &str, value: bool) -> anyhow::Result<()> {
        let spec = field(flag).ok_or_else(|| anyhow!("unknown field: {}", flag))?;
        if spec.kind != FieldKind::Bool {
            return Err(anyhow!("{} is not a section flag", flag));
        }
        self.fields.insert(flag.to_string(), Value::Bool(value));
        Ok(())
    }

    /// Commit already-read image bytes into a named image field as a data
    /// URL. Applies as a single-field patch on the live draft. Returns the
    /// sha256 digest of the raw bytes.
    pub fn set_image_bytes(
        &mut self,
        name: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> anyhow::Result<String> {
        let spec = field(name).ok_or_else(|| anyhow!("unknown field: {}", name))?;
        if spec.kind != FieldKind::Image {
            return Err(anyhow!("{} is not an image field", name));
        }
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        let data_url = format!("data:{};base64,{}", mime_for(file_name), encoded);
        self.fields.insert(name.to_string(), Value::String(data_url));
        Ok(format!("{:x}", Sha256::digest(bytes)))
    }

    /// Read an image file and commit it. `None` path means the user picked
    /// nothing: the field is left unchanged, not cleared.
    pub fn set_image(&mut self, name: &str, path: Option<&Path>) -> anyhow::Result<Option<String>> {
        let Some(path) = path else {
            return Ok(None);
        };
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read image {}", path.to_string_lossy()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.set_image_bytes(name, &file_name, &bytes).map(Some)
    }

    /// Convert the draft into a typed record (id left at its default; the
    /// store assigns real ids). Fails if an enum field holds a token the form
    /// does not offer.
    pub fn to_record(&self) -> anyhow::Result<StudentRecord> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| anyhow!("draft does not form a valid record: {}", e))
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name.rsplit('.').next().unwrap_or_default();
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
