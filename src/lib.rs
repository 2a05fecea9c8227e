//! csvgen - aggregate operator manifests into an OLM ClusterServiceVersion
//!
//! Walks a directory of multi-document YAML manifests, classifies the
//! Deployments, ServiceAccount, RBAC rules and CRDs it finds, and folds them
//! into a single `ClusterServiceVersion` for the Operator Lifecycle Manager.
//!
//! # Pipeline
//!
//! Files flow through each stage strictly in order:
//!
//! - [`split`] - Splits a file into YAML documents on real `---` boundaries
//! - [`decode`] - Classifies a document against a closed kind registry
//! - [`aggregate`] - Folds classified resources into one aggregation
//! - [`descriptor`] - Builds the ClusterServiceVersion from the aggregation
//! - [`pipeline`] - Drives the walk and owns the I/O seams
//! - [`error`] - Error types

#![deny(missing_docs)]

pub mod aggregate;
pub mod decode;
pub mod descriptor;
pub mod error;
pub mod pipeline;
pub mod split;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Default directory scanned for manifests
pub const DEFAULT_MANIFEST_DIR: &str = "./manifests";
