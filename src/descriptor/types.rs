//! ClusterServiceVersion resource types
//!
//! Only the subset of `operators.coreos.com/v1alpha1` that csvgen populates is
//! modelled. Empty sections are skipped on serialization so the generated
//! document never carries `null` or `[]` placeholders.

use k8s_openapi::api::apps::v1::DeploymentSpec;
use k8s_openapi::api::rbac::v1::PolicyRule;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

/// API version of the ClusterServiceVersion resource
pub const API_VERSION: &str = "operators.coreos.com/v1alpha1";

/// Kind of the ClusterServiceVersion resource
pub const KIND: &str = "ClusterServiceVersion";

/// Install strategy name for Deployment-based operators
pub const DEPLOYMENT_STRATEGY: &str = "deployment";

/// OLM ClusterServiceVersion
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterServiceVersion {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: ClusterServiceVersionSpec,
}

/// ClusterServiceVersion spec
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ClusterServiceVersionSpec {
    /// How OLM installs the operator
    pub install: NamedInstallStrategy,
    /// CRDs owned by the operator
    #[serde(
        rename = "customresourcedefinitions",
        default,
        skip_serializing_if = "CustomResourceDefinitions::is_empty"
    )]
    pub custom_resource_definitions: CustomResourceDefinitions,
}

/// Install strategy with its name tag
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NamedInstallStrategy {
    /// Strategy name, set only when deployments are present
    #[serde(rename = "strategy", default, skip_serializing_if = "Option::is_none")]
    pub strategy_name: Option<String>,
    /// Strategy details
    #[serde(
        rename = "spec",
        default,
        skip_serializing_if = "StrategyDetailsDeployment::is_empty"
    )]
    pub strategy_spec: StrategyDetailsDeployment,
}

/// Deployment install strategy details
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrategyDetailsDeployment {
    /// Deployments to create
    #[serde(rename = "deployments", default, skip_serializing_if = "Vec::is_empty")]
    pub deployment_specs: Vec<StrategyDeploymentSpec>,
    /// Namespaced permissions for the operator's ServiceAccount
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<StrategyDeploymentPermissions>,
    /// Cluster-wide permissions for the operator's ServiceAccount
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_permissions: Vec<StrategyDeploymentPermissions>,
}

impl StrategyDetailsDeployment {
    /// True when no section would be serialized
    pub fn is_empty(&self) -> bool {
        self.deployment_specs.is_empty()
            && self.permissions.is_empty()
            && self.cluster_permissions.is_empty()
    }
}

/// A named Deployment spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StrategyDeploymentSpec {
    /// Deployment name
    pub name: String,
    /// Deployment spec, copied verbatim
    pub spec: DeploymentSpec,
}

/// RBAC rules bound to a ServiceAccount
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrategyDeploymentPermissions {
    /// ServiceAccount the rules apply to
    pub service_account_name: String,
    /// Rules
    pub rules: Vec<PolicyRule>,
}

/// CRDs owned or required by the operator
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomResourceDefinitions {
    /// CRDs the operator owns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owned: Vec<CrdDescription>,
}

impl CustomResourceDefinitions {
    /// True when no CRDs are listed
    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }
}

/// Identifies one CRD in the ClusterServiceVersion
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrdDescription {
    /// Full CRD name (`<plural>.<group>`)
    pub name: String,
    /// Served version
    pub version: String,
    /// Kind of the custom resource
    pub kind: String,
}
