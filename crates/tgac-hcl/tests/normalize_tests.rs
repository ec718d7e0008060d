//! Bare include normalization tests

use pretty_assertions::assert_eq;
use rstest::rstest;
use tgac_fs::NormalizedPath;
use tgac_hcl::{
    BARE_INCLUDE_LABEL, ConfigDocument, Decoder, Error, TerragruntFunctions, normalize_bare_include,
};

fn native(source: &str) -> ConfigDocument {
    ConfigDocument::parse(source, &NormalizedPath::new("/repo/live/app/terragrunt.hcl")).unwrap()
}

#[test]
fn single_bare_include_gets_empty_label() {
    let doc = native("include {\n  path = \"../../root.hcl\"\n}\n");
    let normalized = normalize_bare_include(&doc).unwrap();

    assert!(normalized.changed);
    assert!(normalized.source.contains("include \"\""));
}

#[test]
fn normalization_is_idempotent() {
    let doc = native("# root link\ninclude {\n  path = \"../../root.hcl\"\n}\n");
    let first = normalize_bare_include(&doc).unwrap();
    assert!(first.changed);

    let reparsed = ConfigDocument::parse(first.source.clone(), doc.path()).unwrap();
    let second = normalize_bare_include(&reparsed).unwrap();
    assert!(!second.changed);
    assert_eq!(second.source, first.source);
}

#[test]
fn unrelated_content_is_preserved() {
    let source = "# keep me\nlocals {\n  atlantis_workflow = \"custom\" # trailing\n}\n\ninclude {\n  path = \"../../root.hcl\"\n}\n";
    let normalized = normalize_bare_include(&native(source)).unwrap();

    assert!(normalized.source.contains("# keep me"));
    assert!(normalized.source.contains("atlantis_workflow = \"custom\" # trailing"));
}

#[test]
fn bare_include_decodes_as_empty_label() {
    let doc = native("include {\n  path = \"../../root.hcl\"\n}\n");
    let includes = Decoder::new(TerragruntFunctions).decode_includes(&doc).unwrap();

    assert_eq!(includes.len(), 1);
    assert_eq!(includes[0].label, BARE_INCLUDE_LABEL);
    assert!(includes[0].is_bare());
    assert_eq!(includes[0].path, "../../root.hcl");
}

#[test]
fn bare_include_next_to_labeled_includes() {
    let doc = native(
        "include {\n  path = \"../../root.hcl\"\n}\ninclude \"env\" {\n  path = \"../env.hcl\"\n}\n",
    );
    let includes = Decoder::new(TerragruntFunctions).decode_includes(&doc).unwrap();

    let labels: Vec<_> = includes.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["", "env"]);
}

#[test]
fn two_bare_includes_are_rejected() {
    let doc = native("include {\n  path = \"a.hcl\"\n}\ninclude {\n  path = \"b.hcl\"\n}\n");
    let err = normalize_bare_include(&doc).unwrap_err();
    assert!(matches!(err, Error::MultipleBareIncludeBlocks { .. }));
}

#[rstest]
#[case::bare(r#"{"include": {"path": "../../root.hcl"}}"#)]
#[case::labeled(r#"{"include": {"root": {"path": "../../root.hcl"}}}"#)]
fn json_documents_are_not_rewritten(#[case] source: &str) {
    let doc = ConfigDocument::parse(
        source,
        &NormalizedPath::new("/repo/live/app/terragrunt.hcl.json"),
    )
    .unwrap();
    let normalized = normalize_bare_include(&doc).unwrap();

    assert!(!normalized.changed);
    assert_eq!(normalized.source, source);
}

#[test]
fn documents_without_includes_are_unchanged() {
    let source = "terraform {\n  source = \"../modules/app\"\n}\n";
    let normalized = normalize_bare_include(&native(source)).unwrap();
    assert!(!normalized.changed);
    assert_eq!(normalized.source, source);
}
