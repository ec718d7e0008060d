use pretty_assertions::assert_eq;
use rstest::rstest;
use tgac_fs::NormalizedPath;

#[test]
fn test_normalize_backslashes_to_forward() {
    let path = NormalizedPath::new("foo\\bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_normalize_mixed_slashes() {
    let path = NormalizedPath::new("foo/bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[rstest]
#[case("a/../b", "b")]
#[case("a/./b//c", "a/b/c")]
#[case("/a/b/../../c", "/c")]
#[case("../shared/eks", "../shared/eks")]
#[case("a\\..\\b", "b")]
#[case("", ".")]
fn test_lexical_cleaning(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(input).as_str(), expected);
}

#[rstest]
#[case("/repo/live", "./child", "/repo/live/child")]
#[case("/repo/live", "../modules/vpc", "/repo/modules/vpc")]
#[case("/repo/live", ".\\win", "/repo/live/win")]
#[case("/repo/live", "..\\win-parent", "/repo/win-parent")]
#[case("/repo/live/", "child", "/repo/live/child")]
fn test_join_cleans(#[case] base: &str, #[case] segment: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(base).join(segment).as_str(), expected);
}

#[test]
fn test_absolutize_relative_against_base() {
    let base = NormalizedPath::new("/work");
    let path = NormalizedPath::new("live/prod/terragrunt.hcl");
    assert_eq!(path.absolutize(&base).as_str(), "/work/live/prod/terragrunt.hcl");
}

#[test]
fn test_absolutize_keeps_absolute_paths() {
    let base = NormalizedPath::new("/work");
    let path = NormalizedPath::new("/elsewhere/terragrunt.hcl");
    assert_eq!(path.absolutize(&base), path);
}

#[test]
fn test_is_absolute_drive_letter() {
    assert!(NormalizedPath::new("C:\\infra\\live").is_absolute());
    assert!(!NormalizedPath::new("infra/live").is_absolute());
}

#[test]
fn test_parent() {
    let path = NormalizedPath::new("/foo/bar/baz");
    assert_eq!(path.parent().unwrap().as_str(), "/foo/bar");
    assert_eq!(NormalizedPath::new("/foo").parent().unwrap().as_str(), "/");
    assert_eq!(NormalizedPath::new("/").parent(), None);
}

#[test]
fn test_file_name_and_extension() {
    let path = NormalizedPath::new("live/terragrunt.hcl.json");
    assert_eq!(path.file_name(), Some("terragrunt.hcl.json"));
    assert_eq!(path.extension(), Some("json"));
    assert_eq!(NormalizedPath::new("live/.hidden").extension(), None);
}

#[rstest]
#[case("/repo/live/prod", "/repo", "live/prod")]
#[case("/repo", "/repo/live/prod", "../..")]
#[case("/repo/modules/vpc", "/repo/live/prod", "../../modules/vpc")]
#[case("/repo", "/repo", ".")]
fn test_relative_to(#[case] path: &str, #[case] base: &str, #[case] expected: &str) {
    let relative = NormalizedPath::new(path).relative_to(&NormalizedPath::new(base));
    assert_eq!(relative.as_deref(), Some(expected));
}

#[test]
fn test_relative_to_different_roots() {
    let path = NormalizedPath::new("C:/a");
    assert_eq!(path.relative_to(&NormalizedPath::new("/a")), None);
}

#[test]
fn test_exists_false_for_nonexistent() {
    let path = NormalizedPath::new("/nonexistent/path/that/does/not/exist");
    assert!(!path.exists());
}
