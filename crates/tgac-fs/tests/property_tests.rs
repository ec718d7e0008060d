use proptest::prelude::*;
use tgac_fs::NormalizedPath;

proptest! {
    #[test]
    fn test_normalization_invariants(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        let as_str = path.as_str();

        prop_assert!(!as_str.contains('\\'));

        // Only a network root may start with a double slash
        let remainder = if as_str.starts_with("//") { &as_str[2..] } else { as_str };
        prop_assert!(!remainder.contains("//"));

        // Cleaning is idempotent
        let again = NormalizedPath::new(as_str);
        prop_assert_eq!(&path, &again);
    }

    #[test]
    fn test_join_has_no_dot_components(a in "[a-z./]{0,12}", b in "[a-z./\\\\]{0,12}") {
        let joined = NormalizedPath::new(format!("/{a}")).join(&b);
        prop_assert!(joined.is_absolute());
        prop_assert!(!joined.as_str().split('/').any(|c| c == "." || c == ".."));
    }
}
