//! Zip bundle export of the current student collection, for offline
//! archiving by the trust's administrator.

use anyhow::Context;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::model::StudentRecord;

const MANIFEST_ENTRY: &str = "manifest.json";
const STUDENTS_ENTRY: &str = "students.json";
const CHECKSUMS_ENTRY: &str = "checksums.json";
pub const BUNDLE_FORMAT: &str = "trustdesk-students-v1";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub record_count: usize,
}

pub fn export_students_bundle(
    records: &[StudentRecord],
    out_path: &Path,
) -> anyhow::Result<ExportSummary> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }

    let out_file = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let manifest = json!({
        "format": BUNDLE_FORMAT,
        "version": 1,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": chrono::Utc::now().to_rfc3339(),
        "recordCount": records.len(),
    });
    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    zip.start_file(STUDENTS_ENTRY, opts)
        .context("failed to start students entry")?;
    zip.write_all(
        serde_json::to_string_pretty(records)
            .context("failed to serialize students")?
            .as_bytes(),
    )
    .context("failed to write students entry")?;

    let mut checksums = serde_json::Map::new();
    for record in records {
        checksums.insert(record.id.to_string(), json!(record_digest(record)?));
    }
    zip.start_file(CHECKSUMS_ENTRY, opts)
        .context("failed to start checksums entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&checksums)
            .context("failed to serialize checksums")?
            .as_bytes(),
    )
    .context("failed to write checksums entry")?;

    zip.finish().context("failed to finalize zip bundle")?;

    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT.to_string(),
        record_count: records.len(),
    })
}

/// sha256 over the record's canonical (memory representation) JSON.
pub fn record_digest(record: &StudentRecord) -> anyhow::Result<String> {
    let canonical = serde_json::to_string(record).context("failed to serialize record")?;
    Ok(format!("{:x}", Sha256::digest(canonical.as_bytes())))
}
