//! The opt-in separator stripping mode

use csvgen::pipeline::{Pipeline, PipelineConfig};
use csvgen::split::SplitMode;

use super::fixtures::*;

fn stripping_pipeline(dir: &std::path::Path) -> Pipeline {
    Pipeline::new(
        PipelineConfig::new(CSV_NAME)
            .with_manifest_dir(dir)
            .with_split_mode(SplitMode::StripSeparators),
    )
}

#[test]
fn standalone_crd_files_still_decode() {
    let mut files = basic_operator();
    files.push(("crd.yaml", CRD));
    let dir = manifest_dir(&files);

    let csv = stripping_pipeline(dir.path()).run().expect("should generate CSV");
    assert_eq!(csv.spec.custom_resource_definitions.owned.len(), 1);
    assert_eq!(csv.spec.install.strategy_spec.deployment_specs.len(), 1);
}

/// Story: stripping merges a CRD with its neighbours
///
/// A file bundling the ServiceAccount with a CRD loses every separator, the
/// merged text is no longer a valid manifest, and the ServiceAccount is never
/// seen. The default splitter handles the same file correctly.
#[test]
fn story_stripping_loses_documents_bundled_with_a_crd() {
    let bundle = format!("{CRD}---\n{SERVICE_ACCOUNT}");
    let dir = manifest_dir(&[("bundle.yaml", bundle.as_str()), ("role.yaml", ROLE)]);

    let err = stripping_pipeline(dir.path())
        .run()
        .expect_err("ServiceAccount should be lost");
    assert!(matches!(err, csvgen::Error::Validation(_)));

    let csv = pipeline(dir.path()).run().expect("default mode should succeed");
    assert_eq!(csv.spec.custom_resource_definitions.owned.len(), 1);
    assert_eq!(
        csv.spec.install.strategy_spec.permissions[0].service_account_name,
        "svc"
    );
}
