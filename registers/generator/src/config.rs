// Licensed under the Apache-2.0 license

//! Configuration for output selection and filtering during code generation.
//!
//! [`GeneratorConfig`] picks the output backend and the provenance written
//! into generated headers. [`FilterConfig`] controls which peripherals are
//! emitted.

use crate::output::{Backend, GoBackend, TockRegistersBackend};

/// Output language of the generated bindings.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputFormat {
    /// Go package with `unsafe.Pointer` overlays, one file per device.
    #[default]
    Go,
    /// Rust module using `tock-registers` `register_structs!` overlays.
    TockRegisters,
}

/// Configuration for a generator run.
///
/// # Example
///
/// ```
/// use mcu_registers_generator::config::{FilterConfig, GeneratorConfig, OutputFormat};
///
/// let config = GeneratorConfig::new()
///     .with_format(OutputFormat::TockRegisters)
///     .with_descriptor_source("https://example.com/svd")
///     .with_filter(FilterConfig::new().exclude_peripheral("FICR"));
/// assert_eq!(config.backend().extension(), "rs");
/// ```
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub format: OutputFormat,
    /// Go package name; also used as the first build tag.
    pub package: String,
    /// Overrides the source URL recorded in the device model.
    pub descriptor_source: Option<String>,
    pub filter: FilterConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            package: "device".to_string(),
            descriptor_source: None,
            filter: FilterConfig::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_package(mut self, package: &str) -> Self {
        self.package = package.to_string();
        self
    }

    pub fn with_descriptor_source(mut self, url: &str) -> Self {
        self.descriptor_source = Some(url.to_string());
        self
    }

    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Backend rendering the configured output format.
    pub fn backend(&self) -> Box<dyn Backend> {
        match self.format {
            OutputFormat::Go => Box::new(GoBackend::new(&self.package)),
            OutputFormat::TockRegisters => Box::new(TockRegistersBackend),
        }
    }
}

/// Configuration for filtering which peripherals are generated.
///
/// # Example
///
/// ```
/// use mcu_registers_generator::config::FilterConfig;
///
/// let config = FilterConfig::new()
///     .exclude_peripheral("FICR")
///     .exclude_peripheral("uicr");
/// assert!(!config.should_include("UICR"));
/// assert!(config.should_include("UART0"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct FilterConfig {
    /// Exclude peripherals whose names match (case-insensitive).
    pub exclude_names: Vec<String>,
}

impl FilterConfig {
    /// Create a new FilterConfig with no filtering (everything included).
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude a peripheral by name (case-insensitive).
    pub fn exclude_peripheral(mut self, name: &str) -> Self {
        self.exclude_names.push(name.to_lowercase());
        self
    }

    /// Returns true if this filter has no constraints (everything passes).
    pub fn is_empty(&self) -> bool {
        self.exclude_names.is_empty()
    }

    /// Check whether the peripheral with the given name should be generated.
    pub fn should_include(&self, name: &str) -> bool {
        let name_lower = name.to_lowercase();
        !self.exclude_names.iter().any(|n| *n == name_lower)
    }
}
