//! Repeated runs over the same manifests produce the same bytes

use super::fixtures::*;

/// Story: regenerating the CSV in CI must not produce a diff
///
/// Two runs over an unchanged directory yield byte-identical YAML.
#[test]
fn story_repeated_runs_are_byte_identical() {
    let mut files = basic_operator();
    files.push(("crd.yaml", CRD));
    files.push(("role.yaml", ROLE));
    let dir = manifest_dir(&files);

    let first = pipeline(dir.path())
        .run()
        .and_then(|csv| csv.to_yaml())
        .expect("first run");
    let second = pipeline(dir.path())
        .run()
        .and_then(|csv| csv.to_yaml())
        .expect("second run");

    assert_eq!(first, second);
}

#[test]
fn creation_order_does_not_change_output() {
    let rules_a = CLUSTER_ROLE.replace("widgets/status", "gadgets");
    let files = [
        ("sa.yaml", SERVICE_ACCOUNT),
        ("rbac/b.yaml", CLUSTER_ROLE),
        ("rbac/a.yaml", rules_a.as_str()),
        ("deploy.yaml", DEPLOYMENT),
    ];

    let forward = manifest_dir(&files);
    let reversed = tempfile::tempdir().expect("should create temp dir");
    let mut backwards = files.to_vec();
    backwards.reverse();
    write_files(reversed.path(), &backwards);

    let forward_yaml = pipeline(forward.path())
        .run()
        .and_then(|csv| csv.to_yaml())
        .expect("forward run");
    let reversed_yaml = pipeline(reversed.path())
        .run()
        .and_then(|csv| csv.to_yaml())
        .expect("reversed run");

    assert_eq!(forward_yaml, reversed_yaml);
}

#[test]
fn rules_follow_sorted_path_order() {
    let rules_a = CLUSTER_ROLE.replace("widgets/status", "gadgets");
    let dir = manifest_dir(&[
        ("sa.yaml", SERVICE_ACCOUNT),
        ("rbac/b.yaml", CLUSTER_ROLE),
        ("rbac/a.yaml", rules_a.as_str()),
    ]);

    let csv = pipeline(dir.path()).run().expect("should generate CSV");
    let rules = &csv.spec.install.strategy_spec.cluster_permissions[0].rules;
    assert_eq!(rules.len(), 4);
    assert_eq!(rules[1].resources.as_deref(), Some(&["gadgets".to_string()][..]));
    assert_eq!(
        rules[3].resources.as_deref(),
        Some(&["widgets/status".to_string()][..])
    );
}
