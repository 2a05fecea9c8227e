//! Manifest classification
//!
//! A [`Decoder`] owns a closed registry mapping a manifest `kind` to the
//! function that decodes it. Decoders are built explicitly per run, so tests
//! and callers choose exactly which kinds are recognized and nothing is
//! registered process-wide.
//!
//! Unregistered kinds are skipped quietly. Documents that fail to parse, lack
//! `apiVersion`/`kind`, do not match the typed schema of a registered kind, or
//! have no `metadata.name` return a [`DecodeError`]. Callers log it and move on.

use std::collections::BTreeMap;
use std::fmt;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::ServiceAccount;
use k8s_openapi::api::rbac::v1::{ClusterRole, PolicyRule, Role};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::Metadata;
use kube::core::TypeMeta;
use serde::de::Error as _;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::descriptor::{CrdDescription, StrategyDeploymentSpec};
use crate::split::RawDocument;

/// A manifest recognized by the decoder
#[derive(Clone, Debug, PartialEq)]
pub enum Resource {
    /// A Deployment, reduced to its name and spec
    Workload(StrategyDeploymentSpec),
    /// A ServiceAccount
    Identity {
        /// ServiceAccount name
        name: String,
    },
    /// Rules of a ClusterRole
    ClusterRules(Vec<PolicyRule>),
    /// Rules of a Role
    NamespaceRules(Vec<PolicyRule>),
    /// A CustomResourceDefinition
    Schema(CrdDescription),
}

impl Resource {
    /// Kind tag of this resource
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Workload(_) => ResourceKind::Deployment,
            Resource::Identity { .. } => ResourceKind::ServiceAccount,
            Resource::ClusterRules(_) => ResourceKind::ClusterRole,
            Resource::NamespaceRules(_) => ResourceKind::Role,
            Resource::Schema(_) => ResourceKind::CustomResourceDefinition,
        }
    }
}

/// Kinds the decoder knows how to read
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    /// `apps/v1` Deployment
    Deployment,
    /// `v1` ServiceAccount
    ServiceAccount,
    /// `rbac.authorization.k8s.io/v1` ClusterRole
    ClusterRole,
    /// `rbac.authorization.k8s.io/v1` Role
    Role,
    /// `apiextensions.k8s.io/v1` CustomResourceDefinition
    CustomResourceDefinition,
}

impl ResourceKind {
    /// Every kind, in registry order
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Deployment,
        ResourceKind::ServiceAccount,
        ResourceKind::ClusterRole,
        ResourceKind::Role,
        ResourceKind::CustomResourceDefinition,
    ];

    /// The `kind` string as it appears in a manifest
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Deployment => "Deployment",
            ResourceKind::ServiceAccount => "ServiceAccount",
            ResourceKind::ClusterRole => "ClusterRole",
            ResourceKind::Role => "Role",
            ResourceKind::CustomResourceDefinition => "CustomResourceDefinition",
        }
    }

    fn decode_fn(self) -> DecodeFn {
        match self {
            ResourceKind::Deployment => decode_deployment,
            ResourceKind::ServiceAccount => decode_service_account,
            ResourceKind::ClusterRole => decode_cluster_role,
            ResourceKind::Role => decode_role,
            ResourceKind::CustomResourceDefinition => decode_crd,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recoverable failure to decode one document
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file is not valid UTF-8
    #[error("manifest is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The document is not valid YAML
    #[error("invalid YAML: {0}")]
    Yaml(#[source] serde_yaml::Error),

    /// The document has no `apiVersion`/`kind` header
    #[error("missing apiVersion/kind: {0}")]
    MissingTypeMeta(#[source] serde_yaml::Error),

    /// The document does not match the schema registered for its kind
    #[error("failed to decode {kind}: {source}")]
    Schema {
        /// Kind read from the document header
        kind: String,
        /// Underlying error
        source: serde_yaml::Error,
    },
}

type DecodeFn = fn(&serde_yaml::Value) -> Result<Resource, serde_yaml::Error>;

/// Closed registry of decodable kinds
#[derive(Clone)]
pub struct Decoder {
    registry: BTreeMap<&'static str, DecodeFn>,
}

impl Decoder {
    /// Create a decoder that recognizes exactly `kinds`
    pub fn new(kinds: impl IntoIterator<Item = ResourceKind>) -> Self {
        let registry = kinds
            .into_iter()
            .map(|kind| (kind.as_str(), kind.decode_fn()))
            .collect();
        Self { registry }
    }

    /// Registered kind strings, sorted
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.registry.keys().copied()
    }

    /// Classify and decode one document.
    ///
    /// Returns `Ok(None)` for empty documents and unregistered kinds.
    pub fn decode(&self, doc: RawDocument<'_>) -> Result<Option<Resource>, DecodeError> {
        let value = doc.body.map_err(DecodeError::Yaml)?;
        if value.is_null() {
            return Ok(None);
        }

        let type_meta = TypeMeta::deserialize(&value).map_err(DecodeError::MissingTypeMeta)?;
        let Some(decode) = self.registry.get(type_meta.kind.as_str()) else {
            debug!(
                path = %doc.path.display(),
                index = doc.index,
                kind = %type_meta.kind,
                "Skipping unrecognized kind"
            );
            return Ok(None);
        };

        decode(&value).map(Some).map_err(|source| DecodeError::Schema {
            kind: type_meta.kind,
            source,
        })
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(ResourceKind::ALL)
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("kinds", &self.kinds().collect::<Vec<_>>())
            .finish()
    }
}

// =============================================================================
// Per-kind decoders
// =============================================================================

/// `metadata.name`, which every decoded kind must carry
fn object_name<K: Metadata<Ty = ObjectMeta>>(object: &K) -> Result<String, serde_yaml::Error> {
    match object.metadata().name.as_deref() {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(serde_yaml::Error::custom("metadata.name is missing or empty")),
    }
}

fn decode_deployment(value: &serde_yaml::Value) -> Result<Resource, serde_yaml::Error> {
    let deployment = Deployment::deserialize(value)?;
    Ok(Resource::Workload(StrategyDeploymentSpec {
        name: object_name(&deployment)?,
        spec: deployment.spec.unwrap_or_default(),
    }))
}

fn decode_service_account(value: &serde_yaml::Value) -> Result<Resource, serde_yaml::Error> {
    let service_account = ServiceAccount::deserialize(value)?;
    Ok(Resource::Identity {
        name: object_name(&service_account)?,
    })
}

fn decode_cluster_role(value: &serde_yaml::Value) -> Result<Resource, serde_yaml::Error> {
    let role = ClusterRole::deserialize(value)?;
    Ok(Resource::ClusterRules(role.rules.unwrap_or_default()))
}

fn decode_role(value: &serde_yaml::Value) -> Result<Resource, serde_yaml::Error> {
    let role = Role::deserialize(value)?;
    Ok(Resource::NamespaceRules(role.rules.unwrap_or_default()))
}

fn decode_crd(value: &serde_yaml::Value) -> Result<Resource, serde_yaml::Error> {
    let crd = CustomResourceDefinition::deserialize(value)?;
    let versions = &crd.spec.versions;
    let version = versions
        .iter()
        .find(|v| v.storage)
        .or_else(|| versions.iter().find(|v| v.served))
        .or_else(|| versions.first())
        .map(|v| v.name.clone())
        .unwrap_or_default();

    Ok(Resource::Schema(CrdDescription {
        name: object_name(&crd)?,
        version,
        kind: crd.spec.names.kind.clone(),
    }))
}
