use filelog_core::fs::{DEFAULT_DIR_MODE, exists, is_directory, mkdirs, real_path, remove};
use tempfile::tempdir;

#[test]
fn mkdirs_creates_every_missing_segment() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("a").join("b").join("c");
    let target_str = target.to_string_lossy().into_owned();

    assert!(mkdirs(&target_str, DEFAULT_DIR_MODE));
    assert!(is_directory(dir.path().join("a")));
    assert!(is_directory(dir.path().join("a/b")));
    assert!(is_directory(&target));

    // Already there.
    assert!(mkdirs(&target_str, DEFAULT_DIR_MODE));
}

#[test]
fn mkdirs_fails_when_a_segment_is_a_file() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("blocker"), b"x").unwrap();
    let target = dir.path().join("blocker").join("inner");

    assert!(!mkdirs(&target.to_string_lossy(), DEFAULT_DIR_MODE));
    assert!(!exists(&target));
}

#[test]
fn mkdirs_accepts_backslash_separators() {
    let dir = tempdir().unwrap();
    let target = format!("{}/p\\q", dir.path().display());
    assert!(mkdirs(&target, DEFAULT_DIR_MODE));
    assert!(is_directory(dir.path().join("p")));
    assert!(is_directory(&target));
}

#[test]
fn remove_dispatches_on_kind() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("f.txt");
    let sub = dir.path().join("sub");
    std::fs::write(&file, b"x").unwrap();
    std::fs::create_dir(&sub).unwrap();

    assert!(remove(&file));
    assert!(remove(&sub));
    assert!(!exists(&file) && !exists(&sub));
    assert!(!remove(&file));
}

#[test]
fn remove_refuses_non_empty_directory() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("full");
    std::fs::create_dir(&sub).unwrap();
    std::fs::write(sub.join("keep"), b"x").unwrap();
    assert!(!remove(&sub));
    assert!(exists(&sub));
}

#[test]
fn real_path_resolves_or_is_empty() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("x")).unwrap();
    let dotted = dir.path().join("x").join("..").join("x");
    let want = std::fs::canonicalize(dir.path().join("x")).unwrap();

    assert_eq!(real_path(&dotted), want.to_string_lossy());
    assert_eq!(real_path(dir.path().join("missing")), "");
}
