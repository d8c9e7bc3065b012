//! Tests for fragment discovery against a synthetic inbox tree

use std::fs;
use std::path::Path;
use tempfile::tempdir;

use messenger_analysis::error::AnalysisError;
use messenger_analysis::models::FragmentRef;
use messenger_analysis::scanner::ConversationScanner;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "{}").unwrap();
}

fn scan_ids(scanner: &ConversationScanner) -> Vec<(String, String)> {
    scanner
        .scan()
        .unwrap()
        .map(|f| {
            let f: FragmentRef = f.unwrap();
            let file = f.path.file_name().unwrap().to_string_lossy().into_owned();
            (f.conversation_id, file)
        })
        .collect()
}

#[test]
fn test_discovers_fragments_in_order() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(root, "messages/inbox/bob_2/message_1.json");
    touch(root, "messages/inbox/alice_1/message_2.json");
    touch(root, "messages/inbox/alice_1/message_1.json");

    let found = scan_ids(&ConversationScanner::new(root));
    assert_eq!(
        found,
        vec![
            ("alice_1".to_string(), "message_1.json".to_string()),
            ("alice_1".to_string(), "message_2.json".to_string()),
            ("bob_2".to_string(), "message_1.json".to_string()),
        ]
    );
}

#[test]
fn test_skips_other_extensions_and_deep_files() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(root, "messages/inbox/alice_1/message_1.json");
    touch(root, "messages/inbox/alice_1/photos/12345.jpg");
    touch(root, "messages/inbox/alice_1/files/attached.json");
    touch(root, "messages/inbox/alice_1/notes.txt");

    let found = scan_ids(&ConversationScanner::new(root));
    assert_eq!(found, vec![("alice_1".to_string(), "message_1.json".to_string())]);
}

#[test]
fn test_skips_files_directly_in_inbox() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(root, "messages/inbox/stray.json");
    touch(root, "messages/inbox/alice_1/message_1.json");

    let found = scan_ids(&ConversationScanner::new(root));
    assert_eq!(found, vec![("alice_1".to_string(), "message_1.json".to_string())]);
}

#[test]
fn test_custom_extension_and_depth() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(root, "messages/inbox/alice_1/files/attached.json");
    touch(root, "messages/inbox/alice_1/message_1.dat");

    let deeper = ConversationScanner::new(root).with_max_separators(7);
    assert_eq!(scan_ids(&deeper), vec![("files".to_string(), "attached.json".to_string())]);

    let dat = ConversationScanner::new(root).with_extension("dat");
    assert_eq!(scan_ids(&dat), vec![("alice_1".to_string(), "message_1.dat".to_string())]);
}

#[test]
fn test_scan_is_restartable() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "messages/inbox/alice_1/message_1.json");
    let scanner = ConversationScanner::new(dir.path());

    assert_eq!(scanner.scan().unwrap().count(), 1);
    assert_eq!(scanner.scan().unwrap().count(), 1);
}

#[test]
fn test_missing_inbox_fails_fast() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("messages")).unwrap();

    let err = ConversationScanner::new(dir.path()).scan().err().unwrap();
    assert!(matches!(err, AnalysisError::MissingInbox(_)));
}

mod properties {
    use messenger_analysis::scanner::{conversation_id, conversation_id_from_dir, separator_depth};
    use proptest::prelude::*;
    use std::path::PathBuf;

    proptest! {
        #[test]
        fn id_is_last_directory_name(id in "[a-z][a-z0-9_-]{1,24}", archive in "[a-z]{1,8}") {
            let dir = format!("raw-data/{archive}/messages/inbox/{id}");
            prop_assert_eq!(conversation_id_from_dir(&dir), Some(id.clone()));

            let file = PathBuf::from(dir).join("message_1.json");
            prop_assert_eq!(conversation_id(&file), Some(id));
        }

        #[test]
        fn depth_grows_with_nesting(extra in 0usize..6) {
            let mut path = PathBuf::from("messages/inbox/alice_1");
            for i in 0..extra {
                path.push(format!("sub{i}"));
            }
            path.push("message_1.json");
            prop_assert_eq!(separator_depth(&path), 5 + extra);
        }
    }
}
