use chrono::{Local, TimeZone};
use filetime::{FileTime, set_file_mtime};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use datesort::{Config, ConflictPolicy, engine, scan};

fn stamp(path: &Path, y: i32, m: u32, d: u32) {
    let t: std::time::SystemTime = Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap().into();
    set_file_mtime(path, FileTime::from_system_time(t)).unwrap();
}

#[test]
fn one_failing_entry_does_not_stop_the_batch() {
    let td = tempdir().unwrap();
    let src = td.path().join("in");
    let dest = td.path().join("out");
    fs::create_dir_all(&src).unwrap();

    for name in ["a.txt", "b.txt", "c.txt"] {
        let f = src.join(name);
        fs::write(&f, name).unwrap();
        stamp(&f, 2024, 3, 5);
    }

    let cfg = Config::new(&src, &dest);
    let plan = scan::plan(&cfg, None).unwrap();

    // The middle source vanishes between scan and execution.
    fs::remove_file(src.join("b.txt")).unwrap();

    let summary = engine::execute(&plan, &cfg);

    assert_eq!(summary.moved(), 2);
    assert_eq!(summary.failed(), 1);
    assert!(!summary.is_clean());
    assert!(summary.failures()[0].source.ends_with("b.txt"));
    assert!(!summary.failures()[0].cause.is_empty());

    let bucket = dest.join("2024").join("202403").join("20240305");
    assert!(bucket.join("a.txt").exists());
    assert!(bucket.join("c.txt").exists());
}

#[test]
fn rename_suffix_is_recomputed_when_the_slot_fills_late() {
    let td = tempdir().unwrap();
    let src = td.path().join("in");
    let dest = td.path().join("out");
    fs::create_dir_all(&src).unwrap();

    let f = src.join("pic.png");
    fs::write(&f, b"mine").unwrap();
    stamp(&f, 2024, 3, 5);

    let cfg = Config::with_policy(&src, &dest, ConflictPolicy::Rename);
    // Clean at scan time: the plan says plain move.
    let plan = scan::plan(&cfg, None).unwrap();

    // An external writer takes the slot afterwards.
    let bucket = dest.join("2024").join("202403").join("20240305");
    fs::create_dir_all(&bucket).unwrap();
    fs::write(bucket.join("pic.png"), b"theirs").unwrap();

    let summary = engine::execute(&plan, &cfg);

    assert_eq!(summary.moved(), 1);
    assert_eq!(fs::read(bucket.join("pic.png")).unwrap(), b"theirs");
    assert_eq!(fs::read(bucket.join("pic_1.png")).unwrap(), b"mine");
}

#[test]
fn skip_policy_also_covers_conflicts_that_appear_late() {
    let td = tempdir().unwrap();
    let src = td.path().join("in");
    let dest = td.path().join("out");
    fs::create_dir_all(&src).unwrap();

    let f = src.join("doc.txt");
    fs::write(&f, b"mine").unwrap();
    stamp(&f, 2024, 3, 5);

    let cfg = Config::with_policy(&src, &dest, ConflictPolicy::Skip);
    let plan = scan::plan(&cfg, None).unwrap();

    let bucket = dest.join("2024").join("202403").join("20240305");
    fs::create_dir_all(&bucket).unwrap();
    fs::write(bucket.join("doc.txt"), b"theirs").unwrap();

    let summary = engine::execute(&plan, &cfg);

    assert_eq!(summary.moved(), 0);
    assert_eq!(summary.skipped(), 1);
    assert_eq!(fs::read(bucket.join("doc.txt")).unwrap(), b"theirs");
    assert_eq!(fs::read(&f).unwrap(), b"mine");
}
