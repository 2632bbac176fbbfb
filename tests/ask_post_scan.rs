use chrono::{Local, TimeZone};
use filetime::{FileTime, set_file_mtime};
use std::fs;
use std::io;
use std::path::Path;
use tempfile::tempdir;

use datesort::plan::ResolvedAction;
use datesort::{Config, ConflictPolicy, Prompt, engine, scan};

fn stamp(path: &Path, y: i32, m: u32, d: u32) {
    let t: std::time::SystemTime = Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap().into();
    set_file_mtime(path, FileTime::from_system_time(t)).unwrap();
}

/// Answers every overwrite question with a canned reply.
struct Canned(bool);

impl Prompt for Canned {
    fn confirm_overwrite(&mut self, _dest: &Path) -> io::Result<bool> {
        Ok(self.0)
    }
}

/// Counts how often it is consulted.
struct Counting {
    answer: bool,
    asked: usize,
}

impl Prompt for Counting {
    fn confirm_overwrite(&mut self, _dest: &Path) -> io::Result<bool> {
        self.asked += 1;
        Ok(self.answer)
    }
}

#[test]
fn one_prompt_serves_every_conflict_in_a_scan() {
    let td = tempdir().unwrap();
    let src = td.path().join("in");
    let dest = td.path().join("out");
    fs::create_dir_all(&src).unwrap();

    let bucket = dest.join("2024").join("202403").join("20240305");
    fs::create_dir_all(&bucket).unwrap();
    for name in ["a.txt", "b.txt", "c.txt"] {
        let f = src.join(name);
        fs::write(&f, b"new").unwrap();
        stamp(&f, 2024, 3, 5);
        fs::write(bucket.join(name), b"old").unwrap();
    }

    let cfg = Config::with_policy(&src, &dest, ConflictPolicy::Ask);
    let mut prompt = Counting {
        answer: true,
        asked: 0,
    };
    let plan = scan::plan(&cfg, Some(&mut prompt)).unwrap();

    assert_eq!(prompt.asked, 3);
    assert_eq!(plan.len(), 3);
    assert!(
        plan.iter()
            .all(|op| op.resolved_action == ResolvedAction::Overwrite)
    );

    let summary = engine::execute(&plan, &cfg);
    assert_eq!(summary.moved(), 3);
    for name in ["a.txt", "b.txt", "c.txt"] {
        assert_eq!(fs::read(bucket.join(name)).unwrap(), b"new");
    }
}

#[test]
fn conflict_appearing_after_scan_is_skipped_with_a_warning() {
    let td = tempdir().unwrap();
    let src = td.path().join("in");
    let dest = td.path().join("out");
    fs::create_dir_all(&src).unwrap();

    let f = src.join("doc.txt");
    fs::write(&f, b"incoming").unwrap();
    stamp(&f, 2024, 3, 5);

    let cfg = Config::with_policy(&src, &dest, ConflictPolicy::Ask);
    // No conflict during the scan, so no question is asked.
    let plan = scan::plan(&cfg, Some(&mut Canned(true))).unwrap();
    assert!(matches!(plan[0].resolved_action, ResolvedAction::Move));

    // An external writer claims the slot before execution.
    let bucket = dest.join("2024").join("202403").join("20240305");
    fs::create_dir_all(&bucket).unwrap();
    fs::write(bucket.join("doc.txt"), b"external").unwrap();

    let summary = engine::execute(&plan, &cfg);

    assert_eq!(summary.moved(), 0);
    assert_eq!(summary.skipped(), 1);
    assert!(summary.is_clean());
    assert!(
        summary
            .warnings()
            .iter()
            .any(|w| w.contains("ask-mode does not prompt post-scan")),
        "warnings: {:?}",
        summary.warnings()
    );
    assert_eq!(fs::read(&f).unwrap(), b"incoming");
}

#[test]
fn scan_time_yes_is_honored_at_execution() {
    let td = tempdir().unwrap();
    let src = td.path().join("in");
    let dest = td.path().join("out");
    fs::create_dir_all(&src).unwrap();

    let f = src.join("doc.txt");
    fs::write(&f, b"new").unwrap();
    stamp(&f, 2024, 3, 5);

    let bucket = dest.join("2024").join("202403").join("20240305");
    fs::create_dir_all(&bucket).unwrap();
    fs::write(bucket.join("doc.txt"), b"old").unwrap();

    let cfg = Config::with_policy(&src, &dest, ConflictPolicy::Ask);
    let plan = scan::plan(&cfg, Some(&mut Canned(true))).unwrap();
    assert!(matches!(plan[0].resolved_action, ResolvedAction::Overwrite));

    let summary = engine::execute(&plan, &cfg);
    assert_eq!(summary.moved(), 1);
    assert_eq!(fs::read(bucket.join("doc.txt")).unwrap(), b"new");
}

#[test]
fn scan_time_no_stays_a_skip() {
    let td = tempdir().unwrap();
    let src = td.path().join("in");
    let dest = td.path().join("out");
    fs::create_dir_all(&src).unwrap();

    let f = src.join("doc.txt");
    fs::write(&f, b"new").unwrap();
    stamp(&f, 2024, 3, 5);

    let bucket = dest.join("2024").join("202403").join("20240305");
    fs::create_dir_all(&bucket).unwrap();
    fs::write(bucket.join("doc.txt"), b"old").unwrap();

    let cfg = Config::with_policy(&src, &dest, ConflictPolicy::Ask);
    let plan = scan::plan(&cfg, Some(&mut Canned(false))).unwrap();

    let summary = engine::execute(&plan, &cfg);
    assert_eq!(summary.moved(), 0);
    assert_eq!(summary.skipped(), 1);
    assert_eq!(fs::read(bucket.join("doc.txt")).unwrap(), b"old");
    assert_eq!(fs::read(&f).unwrap(), b"new");
}

#[test]
fn unanswered_conflict_without_a_prompt_never_overwrites() {
    let td = tempdir().unwrap();
    let src = td.path().join("in");
    let dest = td.path().join("out");
    fs::create_dir_all(&src).unwrap();

    let f = src.join("doc.txt");
    fs::write(&f, b"new").unwrap();
    stamp(&f, 2024, 3, 5);

    let bucket = dest.join("2024").join("202403").join("20240305");
    fs::create_dir_all(&bucket).unwrap();
    fs::write(bucket.join("doc.txt"), b"old").unwrap();

    let cfg = Config::with_policy(&src, &dest, ConflictPolicy::Ask);
    // A non-interactive run has no prompt to hand to the scanner.
    let plan = scan::plan(&cfg, None).unwrap();
    assert!(matches!(plan[0].resolved_action, ResolvedAction::PromptRequired));

    let summary = engine::execute(&plan, &cfg);
    assert_eq!(summary.moved(), 0);
    assert_eq!(summary.skipped(), 1);
    assert!(!summary.warnings().is_empty());
    assert_eq!(fs::read(bucket.join("doc.txt")).unwrap(), b"old");
}
