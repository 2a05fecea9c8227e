//! Manifest fixtures shared by the pipeline tests

use std::path::Path;

use tempfile::TempDir;

use csvgen::pipeline::{Pipeline, PipelineConfig};

pub const CSV_NAME: &str = "widget-operator.v0.1.0";

pub const SERVICE_ACCOUNT: &str = "\
apiVersion: v1
kind: ServiceAccount
metadata:
  name: svc
  namespace: widget-system
";

/// A ServiceAccount whose plain annotation continues on a line starting with `'`
pub const ANNOTATED_SERVICE_ACCOUNT: &str = "\
apiVersion: v1
kind: ServiceAccount
metadata:
  name: svc
  annotations:
    example.com/rotation: rotate the tokens and catch
      'em all nightly
";

/// A ServiceAccount with no name
pub const NAMELESS_SERVICE_ACCOUNT: &str = "\
apiVersion: v1
kind: ServiceAccount
metadata: {}
";

pub const DEPLOYMENT: &str = "\
apiVersion: apps/v1
kind: Deployment
metadata:
  name: app
  namespace: widget-system
spec:
  replicas: 1
  selector:
    matchLabels:
      app: widget-operator
  template:
    metadata:
      labels:
        app: widget-operator
    spec:
      serviceAccountName: svc
      containers:
      - name: manager
        image: example.com/widget-operator:v0.1.0
        args: [\"--leader-elect\"]
";

pub const CLUSTER_ROLE: &str = "\
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  name: manager-role
rules:
- apiGroups: [example.com]
  resources: [widgets]
  verbs: [get, list, watch, update]
- apiGroups: [example.com]
  resources: [widgets/status]
  verbs: [get, patch]
";

pub const ROLE: &str = "\
apiVersion: rbac.authorization.k8s.io/v1
kind: Role
metadata:
  name: leader-election-role
  namespace: widget-system
rules:
- apiGroups: [coordination.k8s.io]
  resources: [leases]
  verbs: [get, create, update]
";

/// A controller-gen style CRD whose description embeds the document marker
pub const CRD: &str = "\
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
spec:
  group: example.com
  names:
    kind: Widget
    listKind: WidgetList
    plural: widgets
    singular: widget
  scope: Namespaced
  versions:
  - name: v1
    served: true
    storage: true
    schema:
      openAPIV3Schema:
        description: |-
          Widget is the Schema for the widgets API.
          ---
          Everything below the line is managed by the controller.
        properties:
          spec:
            description: >
              WidgetSpec defines the desired state.
              ---
              It's folded, and the apostrophe must not confuse anything.
            type: object
        type: object
";

pub const SERVICE: &str = "\
apiVersion: v1
kind: Service
metadata:
  name: metrics
spec:
  ports:
  - port: 8443
";

/// Write `files` (relative path, content) under a fresh temp dir
pub fn manifest_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("should create temp dir");
    write_files(dir.path(), files);
    dir
}

pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("should create dirs");
        }
        std::fs::write(&path, content).expect("should write manifest");
    }
}

pub fn pipeline(dir: &Path) -> Pipeline {
    Pipeline::new(PipelineConfig::new(CSV_NAME).with_manifest_dir(dir))
}

/// The smallest useful operator: one ServiceAccount, one Deployment, one ClusterRole
pub fn basic_operator() -> Vec<(&'static str, &'static str)> {
    vec![
        ("sa.yaml", SERVICE_ACCOUNT),
        ("deploy.yaml", DEPLOYMENT),
        ("clusterrole.yaml", CLUSTER_ROLE),
    ]
}
