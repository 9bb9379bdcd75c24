use crate::cli::CheckConfigArgs;
use crate::error::{CliError, Result};
use resmut::engine::config::{MutationConfig, MutationConfigBuilder, OptimizationMethod};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialScanConfig {
    step_degrees: Option<f64>,
    range_degrees: Option<f64>,
    nonbonded_cutoff: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialMutationConfig {
    context_radius: Option<f64>,
    method: Option<OptimizationMethod>,
}

/// The scan configuration file. Every key is optional; missing ones take the library
/// defaults.
///
/// ```toml
/// [scan]
/// step-degrees = 10.0
/// range-degrees = 360.0
/// nonbonded-cutoff = 12.0
///
/// [mutation]
/// context-radius = 8.0
/// method = "tree-then-brute-force"
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    scan: Option<PartialScanConfig>,
    mutation: Option<PartialMutationConfig>,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Applies `--set` pairs, then the dedicated flags, over the file's values.
    pub fn merge_with_cli(mut self, args: &CheckConfigArgs) -> Result<MutationConfig> {
        self.apply_set_values(&args.set_values)?;

        let scan = self.scan.unwrap_or_default();
        let mutation = self.mutation.unwrap_or_default();

        let mut builder = MutationConfigBuilder::new();
        if let Some(step) = args.step.or(scan.step_degrees) {
            builder = builder.step_degrees(step);
        }
        if let Some(range) = args.range.or(scan.range_degrees) {
            builder = builder.range_degrees(range);
        }
        if let Some(cutoff) = args.cutoff.or(scan.nonbonded_cutoff) {
            builder = builder.nonbonded_cutoff(cutoff);
        }
        if let Some(radius) = args.context_radius.or(mutation.context_radius) {
            builder = builder.context_radius(radius);
        }
        if let Some(method) = args.method.or(mutation.method) {
            builder = builder.method(method);
        }
        Ok(builder.build()?)
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Argument(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let float = || {
                value.trim().parse::<f64>().map_err(|_| {
                    CliError::Argument(format!("Invalid float value for {}: {}", key, value))
                })
            };

            match key.trim() {
                "scan.step-degrees" => {
                    self.scan.get_or_insert_with(Default::default).step_degrees = Some(float()?);
                }
                "scan.range-degrees" => {
                    self.scan.get_or_insert_with(Default::default).range_degrees = Some(float()?);
                }
                "scan.nonbonded-cutoff" => {
                    self.scan
                        .get_or_insert_with(Default::default)
                        .nonbonded_cutoff = Some(float()?);
                }
                "mutation.context-radius" => {
                    self.mutation
                        .get_or_insert_with(Default::default)
                        .context_radius = Some(float()?);
                }
                "mutation.method" => {
                    self.mutation.get_or_insert_with(Default::default).method =
                        Some(value.parse()?);
                }
                _ => {
                    return Err(CliError::Argument(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
