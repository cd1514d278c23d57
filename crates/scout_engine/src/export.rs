use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::Utc;
use serde_json::json;
use tempfile::NamedTempFile;
use thiserror::Error;

use scout_core::JobConfig;

use crate::types::PlaceRecord;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("manifest serialization: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Writes files under one output directory, staging each through a temp
/// file in that directory so a crashed run never leaves a half-written
/// output behind. The directory is created on first use.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, ExportError> {
        self.prepare_dir()?;

        // Staging in the target directory keeps the final rename on one
        // filesystem and doubles as the writability check.
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .map_err(|e| ExportError::OutputDir(format!("{}: {e}", self.dir.display())))?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file_mut().sync_all()?;

        let target = self.dir.join(filename);
        if target.exists() {
            // Reruns of the same query replace their previous outputs.
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| ExportError::Io(e.error))?;
        Ok(target)
    }

    fn prepare_dir(&self) -> Result<(), ExportError> {
        match fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(ExportError::OutputDir(format!(
                "{} is not a directory",
                self.dir.display()
            ))),
            Err(_) => fs::create_dir_all(&self.dir)
                .map_err(|e| ExportError::OutputDir(format!("{}: {e}", self.dir.display()))),
        }
    }
}

const CSV_HEADER: &str = "Name,Rating,Reviews,Category,Address,Phone,Website,Maps URL";

/// Render records as CSV, header first, RFC 4180 quoting.
pub fn render_csv(records: &[PlaceRecord]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for record in records {
        let fields = [
            &record.name,
            &record.rating,
            &record.reviews,
            &record.category,
            &record.address,
            &record.phone,
            &record.website,
            &record.maps_url,
        ];
        let row: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Filesystem-safe slug for a query, used as the output file stem.
pub fn query_slug(query: &str) -> String {
    let mut slug = String::new();
    let mut last_dash = true;
    for c in query.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "query".to_string()
    } else {
        slug
    }
}

/// Paths produced by a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub manifest: PathBuf,
}

/// Write the CSV and its manifest into the configured output directory.
pub fn write_outputs(
    config: &JobConfig,
    records: &[PlaceRecord],
) -> Result<ExportPaths, ExportError> {
    let slug = query_slug(&config.query);
    let writer = AtomicFileWriter::new(config.output_dir.clone());

    let csv = writer.write(&format!("{slug}.csv"), &render_csv(records))?;

    let manifest_body = serde_json::to_string_pretty(&json!({
        "query": config.query,
        "record_count": records.len(),
        "generated_utc": Utc::now().to_rfc3339(),
        "config": config,
    }))?;
    let manifest = writer.write(&format!("{slug}.manifest.json"), &manifest_body)?;

    Ok(ExportPaths { csv, manifest })
}
