use bundle_fs::ArchivePath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_archive_path_normalization_is_idempotent(s in "[a-z./\\\\]{0,40}") {
        let once = ArchivePath::new(&s);
        let twice = ArchivePath::new(once.as_str());
        prop_assert_eq!(&once, &twice);
    }

    #[test]
    fn test_archive_path_has_no_dot_prefix_or_empty_segments(s in "[a-z./\\\\]{0,40}") {
        let key = ArchivePath::new(&s);
        let as_str = key.as_str();
        prop_assert!(!as_str.starts_with("./"));
        prop_assert!(!as_str.starts_with('/'));
        prop_assert!(!as_str.contains("//"));
        prop_assert!(!as_str.contains('\\'));
    }

    #[test]
    fn test_dot_slash_prefix_does_not_change_key(s in "[a-z]{1,8}(/[a-z]{1,8}){0,3}\\.jar") {
        prop_assert_eq!(ArchivePath::new(&s), ArchivePath::new(&format!("./{}", s)));
    }
}
