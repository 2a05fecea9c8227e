//! Manifest aggregation pipeline
//!
//! One sequential pass: list manifests, then for each file in order split it
//! into documents, classify each document and fold it into the aggregation.
//! Decode failures are logged and skipped. I/O failures and ServiceAccount
//! conflicts abort the run.

mod output;
mod source;

pub use output::{write_to, OutputSink};
pub use source::{is_manifest, FsSource, ManifestSource, MANIFEST_EXTENSIONS};

#[cfg(test)]
pub use source::MockManifestSource;

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::aggregate::{Aggregation, IdentityPolicy};
use crate::decode::{DecodeError, Decoder};
use crate::descriptor::ClusterServiceVersion;
use crate::split::{self, SplitMode};
use crate::{Result, DEFAULT_MANIFEST_DIR};

/// Settings for one pipeline run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory holding the manifests
    pub manifest_dir: PathBuf,
    /// `metadata.name` of the generated ClusterServiceVersion
    pub csv_name: String,
    /// How files are cut into documents
    pub split_mode: SplitMode,
    /// How multiple ServiceAccounts are handled
    pub identity_policy: IdentityPolicy,
}

impl PipelineConfig {
    /// Config with defaults for everything but the CSV name
    pub fn new(csv_name: impl Into<String>) -> Self {
        Self {
            manifest_dir: PathBuf::from(DEFAULT_MANIFEST_DIR),
            csv_name: csv_name.into(),
            split_mode: SplitMode::default(),
            identity_policy: IdentityPolicy::default(),
        }
    }

    /// Set the manifest directory
    pub fn with_manifest_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.manifest_dir = dir.into();
        self
    }

    /// Set the split mode
    pub fn with_split_mode(mut self, mode: SplitMode) -> Self {
        self.split_mode = mode;
        self
    }

    /// Set the ServiceAccount policy
    pub fn with_identity_policy(mut self, policy: IdentityPolicy) -> Self {
        self.identity_policy = policy;
        self
    }
}

/// Counters reported at the end of a run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Manifest files read
    pub files: usize,
    /// Documents produced by the splitter
    pub documents: usize,
    /// Documents classified into a resource
    pub classified: usize,
    /// Documents of an unrecognized kind, or empty
    pub skipped: usize,
    /// Documents or files that failed to decode
    pub failed: usize,
}

/// Drives manifests from a [`ManifestSource`] into a ClusterServiceVersion
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    decoder: Decoder,
}

impl Pipeline {
    /// Create a pipeline recognizing every supported kind
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_decoder(config, Decoder::default())
    }

    /// Create a pipeline with an explicit decoder
    pub fn with_decoder(config: PipelineConfig, decoder: Decoder) -> Self {
        Self { config, decoder }
    }

    /// Run over the configured manifest directory
    pub fn run(&self) -> Result<ClusterServiceVersion> {
        self.run_with(&FsSource::new(&self.config.manifest_dir))
    }

    /// Run over an arbitrary source
    pub fn run_with(&self, source: &dyn ManifestSource) -> Result<ClusterServiceVersion> {
        debug!(
            manifest_dir = %self.config.manifest_dir.display(),
            kinds = ?self.decoder.kinds().collect::<Vec<_>>(),
            "Aggregating manifests"
        );
        let (aggregation, summary) = self.aggregate(source)?;
        info!(
            manifest_dir = %self.config.manifest_dir.display(),
            files = summary.files,
            documents = summary.documents,
            classified = summary.classified,
            skipped = summary.skipped,
            failed = summary.failed,
            service_account = ?aggregation.identity().map(|identity| &identity.name),
            deployments = aggregation.deployments().len(),
            cluster_rules = aggregation.cluster_rules().len(),
            namespace_rules = aggregation.namespace_rules().len(),
            owned_crds = aggregation.owned_crds().len(),
            "Aggregated manifests"
        );
        ClusterServiceVersion::build(&self.config.csv_name, &self.config.manifest_dir, aggregation)
    }

    /// Fold every manifest from `source` into a fresh aggregation
    pub fn aggregate(&self, source: &dyn ManifestSource) -> Result<(Aggregation, RunSummary)> {
        let mut aggregation = Aggregation::new(self.config.identity_policy);
        let mut summary = RunSummary::default();

        for path in source.list()? {
            let bytes = source.read(&path)?;
            summary.files += 1;

            let text = match std::str::from_utf8(&bytes) {
                Ok(text) => text,
                Err(e) => {
                    summary.failed += 1;
                    warn!(
                        path = %path.display(),
                        error = %DecodeError::from(e),
                        "Failed to decode manifest"
                    );
                    continue;
                }
            };
            debug!(path = %path.display(), "Processing manifest");

            for doc in split::documents(&path, text, self.config.split_mode) {
                summary.documents += 1;
                let index = doc.index;
                match self.decoder.decode(doc) {
                    Ok(Some(resource)) => {
                        summary.classified += 1;
                        debug!(
                            path = %path.display(),
                            document = index,
                            kind = %resource.kind(),
                            "Classified manifest"
                        );
                        aggregation.apply(resource, &path)?;
                    }
                    Ok(None) => summary.skipped += 1,
                    Err(error) => {
                        summary.failed += 1;
                        warn!(
                            path = %path.display(),
                            document = index,
                            %error,
                            "Failed to decode manifest"
                        );
                    }
                }
            }
        }

        Ok((aggregation, summary))
    }
}
