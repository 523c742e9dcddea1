// Licensed under the Apache-2.0 license

//! Directory-level driver: discover descriptors, generate one unit per file.
//!
//! Each file is rendered completely in memory before anything is written, so
//! a descriptor that fails leaves no output behind. A failing file, including
//! one whose output cannot be written, does not stop the remaining ones.

use crate::config::GeneratorConfig;
use crate::output::render;
use anyhow::{anyhow, Context, Result};
use log::{error, info};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists `*.svd` files directly inside `input_dir`, sorted by file name.
pub fn discover(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("failed to list {}", input_dir.display()))?;
        let is_svd = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svd"));
        if entry.file_type().is_file() && is_svd {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// A rendered unit waiting to be written.
#[derive(Debug)]
pub struct GeneratedUnit {
    pub input: PathBuf,
    /// Output file name, `{name_lower}.{extension}`.
    pub file_name: String,
    pub code: String,
}

/// Parses, validates and renders one descriptor.
pub fn generate_file(path: &Path, config: &GeneratorConfig) -> Result<GeneratedUnit> {
    let device = mcu_registers_svd::parse_file(path)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    mcu_registers_svd::validate(&device)
        .with_context(|| format!("invalid device model in {}", path.display()))?;
    let code = render(&device, config)
        .with_context(|| format!("failed to render {}", path.display()))?;
    let file_name = format!("{}.{}", device.name_lower, config.backend().extension());
    Ok(GeneratedUnit {
        input: path.to_path_buf(),
        file_name,
        code,
    })
}

/// Outcome of a directory run.
#[derive(Debug, Default)]
pub struct Summary {
    /// Units produced (written, or only rendered in check mode).
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, anyhow::Error)>,
}

impl Summary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Generates a unit for every descriptor in `input_dir` into `output_dir`.
///
/// With `check` set, everything is rendered but nothing is written.
///
/// A descriptor whose device name maps to an output file already produced
/// in this run is reported as failed rather than overwriting it.
pub fn generate_dir(
    input_dir: &Path,
    output_dir: &Path,
    config: &GeneratorConfig,
    check: bool,
) -> Result<Summary> {
    let files = discover(input_dir)?;
    if !check {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("failed to create {}", output_dir.display()))?;
    }

    let mut summary = Summary::default();
    let mut produced: HashMap<String, PathBuf> = HashMap::new();
    for path in files {
        info!("{}", path.display());
        match write_unit(&path, output_dir, config, check, &mut produced) {
            Ok(output_path) => summary.written.push(output_path),
            Err(err) => {
                error!("{err:#}");
                summary.failed.push((path, err));
            }
        }
    }
    Ok(summary)
}

/// Generates one descriptor and writes its unit unless `check` is set.
fn write_unit(
    path: &Path,
    output_dir: &Path,
    config: &GeneratorConfig,
    check: bool,
    produced: &mut HashMap<String, PathBuf>,
) -> Result<PathBuf> {
    let unit = generate_file(path, config)?;
    if let Some(first) = produced.get(&unit.file_name) {
        return Err(anyhow!(
            "{} would overwrite {} already generated from {}",
            path.display(),
            unit.file_name,
            first.display()
        ));
    }

    let output_path = output_dir.join(&unit.file_name);
    if check {
        info!(
            "  would generate {} ({} bytes)",
            output_path.display(),
            unit.code.len()
        );
    } else {
        fs::write(&output_path, &unit.code)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        info!(
            "  generated {} ({} bytes)",
            output_path.display(),
            unit.code.len()
        );
    }
    produced.insert(unit.file_name, path.to_path_buf());
    Ok(output_path)
}
