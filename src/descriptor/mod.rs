//! ClusterServiceVersion construction
//!
//! Turns a finished [`Aggregation`] into the descriptor OLM consumes. Every
//! section is presence-conditional: a permission block, the owned CRD list and
//! the deployment strategy only appear when there is something to put in them.

mod types;

pub use types::{
    ClusterServiceVersion, ClusterServiceVersionSpec, CrdDescription, CustomResourceDefinitions,
    NamedInstallStrategy, StrategyDeploymentPermissions, StrategyDeploymentSpec,
    StrategyDetailsDeployment, API_VERSION, DEPLOYMENT_STRATEGY, KIND,
};

use std::path::Path;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::aggregate::Aggregation;
use crate::{Error, Result};

impl ClusterServiceVersion {
    /// Build the descriptor from the aggregated manifests.
    ///
    /// Fails with a validation error naming `scanned_dir` when no
    /// ServiceAccount was found.
    pub fn build(name: &str, scanned_dir: &Path, aggregation: Aggregation) -> Result<Self> {
        let service_account = match aggregation.identity {
            Some(identity) if !identity.name.is_empty() => identity.name,
            _ => {
                return Err(Error::validation(format!(
                    "unable to find a ServiceAccount manifest in the {} directory",
                    scanned_dir.display()
                )))
            }
        };

        let mut spec = ClusterServiceVersionSpec::default();
        let strategy = &mut spec.install.strategy_spec;

        if !aggregation.cluster_rules.is_empty() {
            strategy.cluster_permissions = vec![StrategyDeploymentPermissions {
                service_account_name: service_account.clone(),
                rules: aggregation.cluster_rules,
            }];
        }
        if !aggregation.namespace_rules.is_empty() {
            strategy.permissions = vec![StrategyDeploymentPermissions {
                service_account_name: service_account,
                rules: aggregation.namespace_rules,
            }];
        }
        if !aggregation.deployments.is_empty() {
            spec.install.strategy_name = Some(DEPLOYMENT_STRATEGY.to_string());
            spec.install.strategy_spec.deployment_specs = aggregation.deployments;
        }
        if !aggregation.owned_crds.is_empty() {
            spec.custom_resource_definitions.owned = aggregation.owned_crds;
        }

        Ok(Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec,
        })
    }

    /// Serialize to a YAML document
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            Error::serialization(format!("failed to encode ClusterServiceVersion: {}", e))
        })
    }
}
