//! Classification and discovery tests

use pretty_assertions::assert_eq;
use tgac_core::{ConfigRole, LocalsResolver, classify, discover_configs};
use tgac_hcl::{Decoder, TerragruntFunctions};
use tgac_test_utils::TestTree;

#[test]
fn config_with_include_is_a_child() {
    let tree = TestTree::new();
    tree.write("root.hcl", "");
    let child = tree.write(
        "live/app/terragrunt.hcl",
        "include \"root\" {\n  path = find_in_parent_folders(\"root.hcl\")\n}\n",
    );

    match classify(&Decoder::new(TerragruntFunctions), &child).unwrap() {
        ConfigRole::Child { includes } => {
            assert_eq!(includes.len(), 1);
            assert_eq!(includes[0].resolved_path(), tree.path("root.hcl"));
        }
        ConfigRole::Parent => panic!("expected a child"),
    }
}

#[test]
fn config_without_include_or_source_is_a_parent() {
    let tree = TestTree::new();
    let root = tree.write("root.hcl", "locals {\n  region = \"eu-west-1\"\n}\n");

    assert_eq!(classify(&Decoder::new(TerragruntFunctions), &root).unwrap(), ConfigRole::Parent);
}

#[test]
fn standalone_config_with_source_is_a_child() {
    let tree = TestTree::new();
    let config = tree.write(
        "terragrunt.hcl",
        "terraform {\n  source = \"../modules/app\"\n}\n",
    );

    assert_eq!(
        classify(&Decoder::new(TerragruntFunctions), &config).unwrap(),
        ConfigRole::Child {
            includes: Vec::new()
        }
    );
}

#[test]
fn source_is_detected_when_other_blocks_fail() {
    let tree = TestTree::new();
    let config = tree.write(
        "terragrunt.hcl",
        "locals {\n  a = local.b\n  b = local.a\n}\nterraform {\n  source = \"../modules/app\"\n}\n",
    );

    assert!(!classify(&Decoder::new(TerragruntFunctions), &config).unwrap().is_parent());
}

#[test]
fn atlantis_project_marks_parents_and_opts_children_out() {
    let tree = TestTree::new();
    let parent = tree.write("root.hcl", "locals {\n  atlantis_project = true\n}\n");
    let child = tree.write(
        "live/terragrunt.hcl",
        "terraform {\n  source = \"../m\"\n}\nlocals {\n  atlantis_project = false\n}\n",
    );
    let plain = tree.write("env.hcl", "");

    let resolver = LocalsResolver::new(tree.root_path().clone());
    let decoder = resolver.decoder();

    let role = classify(decoder, &parent).unwrap();
    assert!(role.is_parent());
    assert!(role.is_project(&resolver.resolve(&parent, None).unwrap()));

    let role = classify(decoder, &child).unwrap();
    assert!(!role.is_project(&resolver.resolve(&child, None).unwrap()));

    let role = classify(decoder, &plain).unwrap();
    assert!(!role.is_project(&resolver.resolve(&plain, None).unwrap()));
}

#[test]
fn discovers_configs_and_skips_caches() {
    let tree = TestTree::new();
    tree.write("root.hcl", "");
    tree.write("live/app/terragrunt.hcl", "");
    tree.write("live/db/terragrunt.hcl.json", "{}");
    tree.write("live/app/.terragrunt-cache/abc/terragrunt.hcl", "");
    tree.write(".git/terragrunt.hcl", "");
    tree.write("live/app/main.tf", "");
    tree.write("live/env.hcl", "");

    let found = discover_configs(tree.root_path()).unwrap();
    assert_eq!(
        found,
        vec![
            tree.path("live/app/terragrunt.hcl"),
            tree.path("live/db/terragrunt.hcl.json"),
            tree.path("root.hcl"),
        ]
    );
}

#[test]
fn discovery_of_missing_root_fails() {
    let tree = TestTree::new();
    assert!(discover_configs(&tree.path("absent")).is_err());
}
