use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use hash_dups::{DupError, FileHasher, ScanProgress, group_files, group_files_with_stats, hash_bytes};
use tempfile::tempdir;

fn write_file(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

fn sample_dir() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"hello");
    write_file(&dir.path().join("b.txt"), b"hello");
    write_file(&dir.path().join("c.txt"), b"world");
    dir
}

fn scan(roots: &[PathBuf], reference: Option<&Path>) -> hash_dups::GroupIndex {
    group_files(roots, reference, &mut FileHasher::default(), &ScanProgress::hidden()).unwrap()
}

#[test]
fn test_groups_by_content() {
    let dir = sample_dir();
    let d = dir.path();
    let index = scan(&[d.to_path_buf()], None);

    assert_eq!(index.len(), 2);
    let hello: Vec<_> = index.get(&hash_bytes(b"hello")).unwrap().iter().cloned().collect();
    assert_eq!(hello, vec![d.join("a.txt"), d.join("b.txt")]);
    let world: Vec<_> = index.get(&hash_bytes(b"world")).unwrap().iter().cloned().collect();
    assert_eq!(world, vec![d.join("c.txt")]);

    let duplicates = index.duplicates();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].fingerprint, hash_bytes(b"hello"));
    assert_eq!(duplicates[0].members(), &[d.join("a.txt"), d.join("b.txt")]);
}

#[test]
fn test_reference_narrows_to_its_group() {
    let dir = sample_dir();
    let d = dir.path();
    let reference = d.join("c.txt");
    let index = scan(&[d.to_path_buf()], Some(&reference));

    assert_eq!(index.len(), 1);
    let only: Vec<_> = index.iter().collect();
    assert_eq!(*only[0].0, hash_bytes(b"world"));
    assert_eq!(only[0].1.iter().collect::<Vec<_>>(), vec![&reference]);
    assert!(index.duplicates().is_empty());
}

#[test]
fn test_reference_outside_roots_is_included() {
    let dir = sample_dir();
    let other = tempdir().unwrap();
    let reference = other.path().join("ref.txt");
    write_file(&reference, b"hello");

    let index = scan(&[dir.path().to_path_buf()], Some(&reference));
    assert_eq!(index.len(), 1);
    let group = index.get(&hash_bytes(b"hello")).unwrap();
    assert_eq!(group.len(), 3);
    assert!(group.contains(&reference));

    let duplicates = index.duplicates();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].len(), 3);
}

#[test]
fn test_reference_without_matches_keeps_singleton() {
    let dir = sample_dir();
    let other = tempdir().unwrap();
    let reference = other.path().join("unique.txt");
    write_file(&reference, b"nothing like it");

    let index = scan(&[dir.path().to_path_buf()], Some(&reference));
    assert_eq!(index.len(), 1);
    assert_eq!(index.total_files(), 1);
    assert!(index.duplicates().is_empty());
}

#[test]
fn test_reference_spelled_differently_is_one_file() {
    let dir = tempdir().unwrap();
    let d = dir.path();
    fs::create_dir(d.join("sub")).unwrap();
    write_file(&d.join("c.txt"), b"world");
    let reference = d.join("sub").join("..").join("c.txt");

    let index = scan(&[d.to_path_buf()], Some(&reference));
    let group = index.get(&hash_bytes(b"world")).unwrap();
    assert_eq!(group.iter().collect::<Vec<_>>(), vec![&reference]);
    assert!(index.duplicates().is_empty());
}

#[test]
fn test_overlapping_roots_do_not_double_count() {
    let dir = sample_dir();
    let d = dir.path();
    fs::create_dir(d.join("sub")).unwrap();

    let index = scan(&[d.to_path_buf(), d.join("sub").join("..")], None);
    assert_eq!(index.total_files(), 3);
    let duplicates = index.duplicates();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].members(), &[d.join("a.txt"), d.join("b.txt")]);
}

#[test]
fn test_directory_reference_fails() {
    let dir = sample_dir();
    let result = group_files(
        &[dir.path().to_path_buf()],
        Some(dir.path()),
        &mut FileHasher::default(),
        &ScanProgress::hidden(),
    );
    assert!(matches!(result, Err(DupError::Io { .. })));
}

#[test]
fn test_missing_reference_fails() {
    let dir = sample_dir();
    let reference = dir.path().join("missing.txt");
    let result = group_files(
        &[dir.path().to_path_buf()],
        Some(&reference),
        &mut FileHasher::default(),
        &ScanProgress::hidden(),
    );
    assert!(matches!(result, Err(DupError::Io { .. })));
}

#[test]
fn test_nested_directories_are_scanned() {
    let dir = tempdir().unwrap();
    let deep = dir.path().join("x").join("y").join("z");
    fs::create_dir_all(&deep).unwrap();
    write_file(&dir.path().join("top.bin"), b"same");
    write_file(&deep.join("bottom.bin"), b"same");

    let duplicates = scan(&[dir.path().to_path_buf()], None).duplicates();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(
        duplicates[0].members(),
        &[dir.path().join("top.bin"), deep.join("bottom.bin")]
    );
}

#[test]
fn test_duplicates_across_roots() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    write_file(&first.path().join("one.txt"), b"shared");
    write_file(&second.path().join("two.txt"), b"shared");

    let duplicates = scan(&[first.path().to_path_buf(), second.path().to_path_buf()], None).duplicates();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].len(), 2);
}

#[test]
fn test_same_root_twice_does_not_double_count() {
    let dir = sample_dir();
    let root = dir.path().to_path_buf();
    let index = scan(&[root.clone(), root], None);
    assert_eq!(index.total_files(), 3);
    assert_eq!(index.duplicates()[0].len(), 2);
}

#[test]
fn test_scan_is_idempotent() {
    let dir = sample_dir();
    let roots = [dir.path().to_path_buf()];
    assert_eq!(scan(&roots, None), scan(&roots, None));
}

#[test]
fn test_missing_root_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let err = group_files(
        &[missing.clone()],
        None,
        &mut FileHasher::default(),
        &ScanProgress::hidden(),
    )
    .unwrap_err();
    assert!(matches!(err, DupError::Path { .. }));
    assert_eq!(err.file_path(), Some(missing.as_path()));
}

#[test]
fn test_file_root_fails() {
    let dir = sample_dir();
    let file = dir.path().join("a.txt");
    let err = group_files(
        &[dir.path().to_path_buf(), file],
        None,
        &mut FileHasher::default(),
        &ScanProgress::hidden(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("not a directory"));
}

#[test]
fn test_empty_directory() {
    let dir = tempdir().unwrap();
    let index = scan(&[dir.path().to_path_buf()], None);
    assert!(index.is_empty());
    assert!(index.duplicates().is_empty());
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = sample_dir();
    let locked = dir.path().join("locked.txt");
    write_file(&locked, b"hello");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read the file anyway; nothing to check then.
    if File::open(&locked).is_ok() {
        return;
    }

    let index = scan(&[dir.path().to_path_buf()], None);
    assert!(index.iter().all(|(_, group)| !group.contains(&locked)));
    assert_eq!(index.total_files(), 3);
    assert_eq!(index.duplicates()[0].len(), 2);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_symlink_to_scanned_file_is_not_a_copy() {
    let dir = sample_dir();
    std::os::unix::fs::symlink(dir.path().join("c.txt"), dir.path().join("link.txt")).unwrap();

    let index = scan(&[dir.path().to_path_buf()], None);
    assert_eq!(index.total_files(), 3);
    let duplicates = index.duplicates();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].fingerprint, hash_bytes(b"hello"));
}

#[cfg(unix)]
#[test]
fn test_symlink_to_outside_file_is_hashed() {
    let dir = sample_dir();
    let other = tempdir().unwrap();
    write_file(&other.path().join("far.txt"), b"world");
    std::os::unix::fs::symlink(other.path().join("far.txt"), dir.path().join("link.txt")).unwrap();

    let duplicates = scan(&[dir.path().to_path_buf()], None).duplicates();
    assert_eq!(duplicates.len(), 2);
}

#[cfg(unix)]
#[test]
fn test_broken_links_do_not_stop_the_scan() {
    let dir = sample_dir();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    write_file(&sub.join("d.txt"), b"world");
    std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("aa-dangling")).unwrap();
    std::os::unix::fs::symlink(sub.join("loop"), sub.join("loop")).unwrap();

    let (index, stats) = group_files_with_stats(
        &[dir.path().to_path_buf()],
        None,
        &mut FileHasher::default(),
        &ScanProgress::hidden(),
    )
    .unwrap();

    assert_eq!(stats.files_skipped, 2);
    assert_eq!(stats.files_hashed, 4);
    let duplicates = index.duplicates();
    assert_eq!(duplicates.len(), 2);
    assert!(duplicates.iter().all(|group| group.len() == 2));
}
