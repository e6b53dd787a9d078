//! Directory driver: header discovery, parallel scanning and output writing.
//!
//! Headers are independent of each other at scan time (cross-type lookups
//! only happen during generation), so scanning fans out across a rayon pool.
//! Discovery order is the sorted path order, which keeps the aggregate init
//! header and the schema dump byte-stable across runs and filesystems.

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::cache::IncrementalCache;
use crate::diagnostics::Diagnostics;
use crate::generator::{aggregate_init_header, generate_entity};
use crate::scanner::scan_header;
use crate::schema::Schema;

#[derive(Debug, Error)]
pub enum BindgenError {
    #[error("i/o failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("schema serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

fn io_error(path: &Path, source: std::io::Error) -> BindgenError {
    BindgenError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Where to drop `export_apis.json`; `None` skips the dump.
    pub json_dir: Option<PathBuf>,
    /// Regenerate even when the input manifest is unchanged.
    pub force: bool,
}

#[derive(Debug)]
pub struct RunReport {
    pub diagnostics: Diagnostics,
    pub files_written: usize,
    pub skipped: bool,
}

/// Finds every `.h` file under `dir`, sorted by path.
pub fn find_headers(dir: &Path) -> Vec<PathBuf> {
    let mut headers: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.path().is_file() && entry.path().extension().is_some_and(|ext| ext == "h")
        })
        .map(|entry| entry.into_path())
        .collect();
    headers.sort();
    headers
}

/// Scans every header under `input_dir` into one schema. Scanning is
/// per-file parallel; entity order follows the sorted path order.
pub fn scan_directory(input_dir: &Path) -> Result<(Schema, Diagnostics), BindgenError> {
    let sources = read_headers(input_dir)?;
    Ok(scan_sources(&sources))
}

fn read_headers(input_dir: &Path) -> Result<Vec<(String, String)>, BindgenError> {
    let mut sources = Vec::new();
    for path in find_headers(input_dir) {
        let content = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        sources.push((name, content));
    }
    Ok(sources)
}

fn scan_sources(sources: &[(String, String)]) -> (Schema, Diagnostics) {
    let outputs: Vec<_> = sources
        .par_iter()
        .map(|(name, content)| {
            debug!(header = %name, "scanning");
            scan_header(content, name)
        })
        .collect();

    let mut schema = Schema::new();
    let mut diagnostics = Diagnostics::new();
    for output in outputs {
        schema.entities.extend(output.entities);
        diagnostics.extend(output.diagnostics);
    }
    (schema, diagnostics)
}

/// Full pipeline: discover, scan, generate, write.
pub fn run(options: &RunOptions) -> Result<RunReport, BindgenError> {
    let sources = read_headers(&options.input_dir)?;
    info!(headers = sources.len(), "discovered interface headers");

    fs::create_dir_all(&options.output_dir).map_err(|e| io_error(&options.output_dir, e))?;
    let cache = IncrementalCache::new(&options.output_dir);
    let manifest = IncrementalCache::compute_manifest(&sources);
    if !options.force && cache.is_fresh(&manifest) {
        info!("inputs unchanged, skipping regeneration");
        return Ok(RunReport {
            diagnostics: Diagnostics::new(),
            files_written: 0,
            skipped: true,
        });
    }

    let (schema, mut diagnostics) = scan_sources(&sources);

    let units: Vec<_> = schema
        .entities
        .iter()
        .map(|entity| generate_entity(entity, &schema, &mut diagnostics))
        .collect();

    let mut files_written = 0;
    for unit in &units {
        write_output(&options.output_dir.join(&unit.header_name), &unit.header)?;
        write_output(&options.output_dir.join(&unit.source_name), &unit.source)?;
        files_written += 2;
    }

    write_output(
        &options.output_dir.join("mri_init_autogen.h"),
        &aggregate_init_header(&units),
    )?;
    files_written += 1;

    if let Some(json_dir) = &options.json_dir {
        fs::create_dir_all(json_dir).map_err(|e| io_error(json_dir, e))?;
        let dump = serde_json::to_string(&schema.entities)?;
        write_output(&json_dir.join("export_apis.json"), &dump)?;
        files_written += 1;
    }

    // A stored manifest must only ever describe a clean run.
    if !diagnostics.has_errors() {
        cache.store(&manifest);
    }

    info!(files = files_written, "generation complete");
    Ok(RunReport {
        diagnostics,
        files_written,
        skipped: false,
    })
}

fn write_output(path: &Path, content: &str) -> Result<(), BindgenError> {
    fs::write(path, content).map_err(|e| io_error(path, e))
}
