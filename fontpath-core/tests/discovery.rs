//! Scanning directories that mix good fonts, bad fonts and other files.

use std::fs;
use std::path::PathBuf;

use fontpath_core::discovery::{scan_roots, FontScanner, ScanOptions};
use fontpath_core::fixtures::simple_font;
use fontpath_core::FontDescriptor;

#[test]
fn corrupt_font_is_skipped_without_stopping_the_scan() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();

    fs::write(root.join("a-broken.ttf"), b"\0\x01\0\0garbage").unwrap();
    fs::write(root.join("b-good.ttf"), simple_font("Good", false, false)).unwrap();

    let entries: Vec<_> = FontScanner::new(root).scan().collect();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].descriptor, FontDescriptor::new("Good", false, false));
    assert_eq!(entries[0].path, root.join("b-good.ttf"));
}

#[test]
fn non_font_extensions_are_never_opened() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    fs::write(root.join("readme.txt"), b"hello").unwrap();
    fs::write(root.join("valid-but-renamed.woff"), simple_font("Hidden", false, false)).unwrap();

    assert_eq!(FontScanner::new(root).scan().count(), 0);
}

#[test]
fn extensions_match_case_insensitively_in_nested_directories() {
    let temp = tempfile::tempdir().expect("tempdir");
    let nested = temp.path().join("Family/Static");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("Upper.OTF"), simple_font("Upper", true, true)).unwrap();

    let entries: Vec<_> = FontScanner::new(temp.path()).scan().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].descriptor, FontDescriptor::new("Upper", true, true));
}

#[test]
fn fonts_without_style_tables_are_skipped() {
    use fontpath_core::fixtures::{name_table, SfntBuilder};

    let temp = tempfile::tempdir().expect("tempdir");
    let bytes = SfntBuilder::new()
        .table(b"name", name_table(&[(3, 1, 1, "Unstyled")]))
        .build();
    fs::write(temp.path().join("unstyled.ttf"), bytes).unwrap();

    assert_eq!(FontScanner::new(temp.path()).scan().count(), 0);
}

#[test]
fn parallel_scan_keeps_root_then_path_order() {
    let first = tempfile::tempdir().expect("tempdir");
    let second = tempfile::tempdir().expect("tempdir");

    for name in ["d", "b", "c", "a"] {
        fs::write(
            first.path().join(format!("{name}.ttf")),
            simple_font(&format!("First {name}"), false, false),
        )
        .unwrap();
    }
    fs::write(second.path().join("0.ttf"), simple_font("Second", false, false)).unwrap();

    let roots = vec![
        second.path().to_path_buf(),
        first.path().to_path_buf(),
        PathBuf::from("/nonexistent/fontpath-root"),
    ];
    let opts = ScanOptions {
        jobs: Some(3),
        ..ScanOptions::default()
    };
    let entries = scan_roots(&roots, &opts).expect("scan");

    let families: Vec<&str> = entries
        .iter()
        .map(|e| e.descriptor.family_name.as_str())
        .collect();
    assert_eq!(
        families,
        vec!["Second", "First a", "First b", "First c", "First d"]
    );
}

#[cfg(unix)]
#[test]
fn symlinked_font_files_are_scanned_without_following_directory_links() {
    use std::os::unix::fs::symlink;

    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("root");
    let elsewhere = temp.path().join("elsewhere");
    fs::create_dir_all(&root).unwrap();
    fs::create_dir_all(&elsewhere).unwrap();
    fs::write(elsewhere.join("Real.ttf"), simple_font("Linked", false, false)).unwrap();
    symlink(elsewhere.join("Real.ttf"), root.join("Linked.ttf")).unwrap();
    symlink(&elsewhere, root.join("linked-dir")).unwrap();
    symlink(elsewhere.join("Missing.ttf"), root.join("Dangling.ttf")).unwrap();

    let entries: Vec<_> = FontScanner::new(&root).scan().collect();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, root.join("Linked.ttf"));
    assert_eq!(entries[0].descriptor, FontDescriptor::new("Linked", false, false));
}
