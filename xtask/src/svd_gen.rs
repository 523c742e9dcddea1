// Licensed under the Apache-2.0 license

//! Generates register bindings for a directory of SVD descriptors.

use crate::Format;
use anyhow::{bail, Context, Result};
use log::{error, info};
use mcu_registers_generator::{generate_dir, FilterConfig, GeneratorConfig, OutputFormat};
use std::path::Path;

pub struct Options<'a> {
    pub input_dir: &'a Path,
    pub output_dir: &'a Path,
    pub format: Format,
    pub package: Option<&'a str>,
    pub source_url: Option<&'a str>,
    pub exclude: &'a [String],
    pub check: bool,
}

/// Maps command line options onto a generator configuration.
fn config(options: &Options) -> Result<GeneratorConfig> {
    let package = match options.package {
        Some(package) => package.to_string(),
        None => options
            .output_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| {
                format!(
                    "cannot derive a package name from {}, pass --package",
                    options.output_dir.display()
                )
            })?,
    };

    let mut filter = FilterConfig::new();
    for name in options.exclude {
        filter = filter.exclude_peripheral(name);
    }

    let mut config = GeneratorConfig::new()
        .with_format(match options.format {
            Format::Go => OutputFormat::Go,
            Format::Rust => OutputFormat::TockRegisters,
        })
        .with_package(&package)
        .with_filter(filter);
    if let Some(url) = options.source_url {
        config = config.with_descriptor_source(url);
    }
    Ok(config)
}

pub fn generate(options: &Options) -> Result<()> {
    let config = config(options)?;
    info!(
        "Generating {:?} bindings from {} into {}",
        options.format,
        options.input_dir.display(),
        options.output_dir.display()
    );

    let summary = generate_dir(options.input_dir, options.output_dir, &config, options.check)?;

    info!("=== Generation Summary ===");
    info!("Generated: {} files", summary.written.len());
    if !summary.is_success() {
        error!("Errors ({}):", summary.failed.len());
        for (path, err) in &summary.failed {
            error!("  {}: {err:#}", path.display());
        }
        bail!("{} descriptor(s) failed to generate", summary.failed.len());
    }
    Ok(())
}
