//! Denylist file loading and tolerant entry parsing

use super::test_utils::write_file;
use reelgate::denylist::{DenylistSource, ForbiddenTitles, JsonFileDenylist};
use reelgate::error::DenylistError;
use reelgate::title::normalize;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_sparse_entries_load_with_empty_collections() {
    let temp = TempDir::new().unwrap();
    let path = write_file(
        temp.path(),
        "forbidden.json",
        r#"[
            {"fid": "f-001", "movie": "Titanic"},
            {"id": "f-002", "movie": "Inception", "aliases": ["인셉션"], "scene_keys": ["hallway_fight"], "trick_keys": ["rotating_set"], "notes": "ignored"},
            {"aliases": ["Parasite", "기생충"]}
        ]"#,
    );

    let entries = JsonFileDenylist::new(&path).load().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].id, "f-001");
    assert!(entries[0].aliases.is_empty());
    assert!(entries[0].scene_keys.is_empty());
    assert_eq!(entries[1].trick_keys, vec!["rotating_set"]);
    assert!(entries[2].movie.is_empty());

    let forbidden = ForbiddenTitles::from_entries(&entries);
    assert_eq!(forbidden.len(), 5);
    assert!(forbidden.contains(&normalize("기생충")));
    assert!(!forbidden.contains(&normalize("")));
}

#[test]
fn test_missing_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let result = JsonFileDenylist::new(temp.path().join("absent.json")).load();
    assert!(matches!(result, Err(DenylistError::NotFound(_))));
}

#[test]
fn test_non_array_document_is_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = write_file(temp.path(), "forbidden.json", r#"{"movie": "Titanic"}"#);
    match JsonFileDenylist::new(&path).load() {
        Err(DenylistError::Parse { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_relative_paths_resolve_against_workspace() {
    let source = JsonFileDenylist::in_workspace(Path::new("/ws"), Path::new("lists/forbidden.json"));
    assert_eq!(source.path(), Path::new("/ws/lists/forbidden.json"));

    let source = JsonFileDenylist::in_workspace(Path::new("/ws"), Path::new("/etc/forbidden.json"));
    assert_eq!(source.path(), Path::new("/etc/forbidden.json"));
}
