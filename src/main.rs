//! csvgen - generate an OLM ClusterServiceVersion from operator manifests

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use csvgen::aggregate::IdentityPolicy;
use csvgen::pipeline::{OutputSink, Pipeline, PipelineConfig};
use csvgen::split::SplitMode;
use csvgen::DEFAULT_MANIFEST_DIR;

/// Aggregate a directory of operator manifests into a ClusterServiceVersion
#[derive(Parser, Debug)]
#[command(name = "csvgen", version, about, long_about = None)]
struct Cli {
    /// Path to the manifests directory
    #[arg(long = "manifests", env = "CSVGEN_MANIFESTS", default_value = DEFAULT_MANIFEST_DIR)]
    manifest_dir: PathBuf,

    /// File to write the generated CSV to (stdout if unset)
    #[arg(long, env = "CSVGEN_OUTPUT_FILE")]
    output_file: Option<PathBuf>,

    /// metadata.name of the generated CSV
    #[arg(long, env = "CSVGEN_CSV_NAME")]
    csv_name: String,

    /// Delete every `---` from files containing a CustomResourceDefinition
    /// before splitting them
    ///
    /// Legacy workaround for CRD descriptions that embed `---`. The default
    /// splitter already handles them, and this mode can merge unrelated
    /// documents, so only enable it to reproduce old output.
    #[arg(long, env = "CSVGEN_STRIP_DESCRIPTORS")]
    strip_descriptors: bool,

    /// What to do when more than one ServiceAccount is found
    #[arg(long, value_enum, default_value_t = IdentityPolicy::Reject)]
    identity_policy: IdentityPolicy,

    /// Log level or filter directive (RUST_LOG takes precedence when set)
    #[arg(long, env = "CSVGEN_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        let split_mode = if self.strip_descriptors {
            SplitMode::StripSeparators
        } else {
            SplitMode::BoundaryAware
        };
        PipelineConfig::new(&self.csv_name)
            .with_manifest_dir(&self.manifest_dir)
            .with_split_mode(split_mode)
            .with_identity_policy(self.identity_policy)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the generated document
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&cli.log_level)
            .with_context(|| format!("failed to parse the {} log level", cli.log_level))?,
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let csv = Pipeline::new(cli.pipeline_config()).run()?;
    OutputSink::from(cli.output_file).write(&csv)?;
    Ok(())
}
