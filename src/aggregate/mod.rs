//! Aggregation of classified manifests
//!
//! [`Aggregation`] is a plain accumulator. Lists are appended in the order
//! resources arrive, without deduplication. The only merge decision is the
//! ServiceAccount, governed by [`IdentityPolicy`].

use std::path::{Path, PathBuf};

use k8s_openapi::api::rbac::v1::PolicyRule;
use tracing::warn;

use crate::decode::Resource;
use crate::descriptor::{CrdDescription, StrategyDeploymentSpec};
use crate::{Error, Result};

/// What to do when more than one ServiceAccount is found
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum IdentityPolicy {
    /// Fail when a second ServiceAccount has a different name
    #[default]
    Reject,
    /// Keep the first ServiceAccount seen
    FirstWins,
    /// Keep the last ServiceAccount seen
    LastWins,
}

/// The ServiceAccount permissions get bound to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    /// ServiceAccount name
    pub name: String,
    /// File the ServiceAccount was read from
    pub origin: PathBuf,
}

/// Everything collected from one manifest directory
#[derive(Clone, Debug, Default)]
pub struct Aggregation {
    policy: IdentityPolicy,
    pub(crate) identity: Option<Identity>,
    pub(crate) cluster_rules: Vec<PolicyRule>,
    pub(crate) namespace_rules: Vec<PolicyRule>,
    pub(crate) owned_crds: Vec<CrdDescription>,
    pub(crate) deployments: Vec<StrategyDeploymentSpec>,
}

impl Aggregation {
    /// Create an empty aggregation
    pub fn new(policy: IdentityPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Fold one resource read from `origin` into the aggregation
    pub fn apply(&mut self, resource: Resource, origin: &Path) -> Result<()> {
        match resource {
            Resource::Workload(deployment) => self.deployments.push(deployment),
            Resource::Identity { name } => self.set_identity(name, origin)?,
            Resource::ClusterRules(rules) => self.cluster_rules.extend(rules),
            Resource::NamespaceRules(rules) => self.namespace_rules.extend(rules),
            Resource::Schema(crd) => self.owned_crds.push(crd),
        }
        Ok(())
    }

    fn set_identity(&mut self, name: String, origin: &Path) -> Result<()> {
        let Some(current) = &self.identity else {
            self.identity = Some(Identity {
                name,
                origin: origin.to_path_buf(),
            });
            return Ok(());
        };
        if current.name == name {
            return Ok(());
        }

        match self.policy {
            IdentityPolicy::Reject => Err(Error::IdentityConflict {
                first: current.name.clone(),
                first_path: current.origin.clone(),
                second: name,
                second_path: origin.to_path_buf(),
            }),
            IdentityPolicy::FirstWins => {
                warn!(
                    kept = %current.name,
                    ignored = %name,
                    path = %origin.display(),
                    "Ignoring additional ServiceAccount"
                );
                Ok(())
            }
            IdentityPolicy::LastWins => {
                warn!(
                    replaced = %current.name,
                    name = %name,
                    path = %origin.display(),
                    "Replacing previously found ServiceAccount"
                );
                self.identity = Some(Identity {
                    name,
                    origin: origin.to_path_buf(),
                });
                Ok(())
            }
        }
    }

    /// ServiceAccount found so far
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// ClusterRole rules, in arrival order
    pub fn cluster_rules(&self) -> &[PolicyRule] {
        &self.cluster_rules
    }

    /// Role rules, in arrival order
    pub fn namespace_rules(&self) -> &[PolicyRule] {
        &self.namespace_rules
    }

    /// CRDs found, in arrival order
    pub fn owned_crds(&self) -> &[CrdDescription] {
        &self.owned_crds
    }

    /// Deployments found, in arrival order
    pub fn deployments(&self) -> &[StrategyDeploymentSpec] {
        &self.deployments
    }
}
