//! Integration tests for export/import functionality.
//!
//! Stores live in temporary directories; every run goes through
//! `InstinctService` the way the CLI drives it.

use chrono::{DateTime, Duration, TimeZone, Utc};
use instinct_core::export::{export, render};
use instinct_core::import::parse_source;
use instinct_core::{
    DecayEngine, EvolveOptions, ExportFormat, FileStore, ImportAction, ImportOptions, Instinct,
    InstinctService, InstinctStore, ListFilter, Source,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
}

fn service(root: &Path) -> InstinctService {
    let personal = root.join("personal");
    let inherited = root.join("inherited");
    InstinctService::new(
        FileStore::new(&personal, &inherited),
        FileStore::single(Source::Inherited, &inherited),
        DecayEngine::new(0.02),
        EvolveOptions::default(),
    )
}

fn seed(store: &FileStore) {
    let records = vec![
        Instinct::new("prefer-early-return", "when writing new functions", "return early", 0.8)
            .with_domain("code-style")
            .with_observations(7)
            .with_source_repo("github.com/acme/api")
            .with_created_at(now() - Duration::weeks(20))
            .with_updated_at(now() - Duration::weeks(3) - Duration::days(2)),
        Instinct::new("table-tests", "when writing go tests", "use table-driven tests", 0.65)
            .with_domain("testing")
            .with_content("Seen in three services.\n\nKeep cases small.")
            .with_updated_at(now() - Duration::days(2)),
        Instinct::new("run-linter", "before committing", "run the linter", 0.9)
            .with_domain("workflow"),
    ];
    for r in &records {
        store.save(r).unwrap();
    }
}

/// Filenames and contents of every file under `dir`, sorted.
fn snapshot_dir(dir: &Path) -> Vec<(String, String)> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<(String, String)> = entries
        .map(|e| e.unwrap().path())
        .map(|p| {
            (
                p.file_name().unwrap().to_string_lossy().to_string(),
                fs::read_to_string(&p).unwrap(),
            )
        })
        .collect();
    files.sort();
    files
}

/// Test export then import preserves every field of the decayed snapshot.
#[test]
fn test_round_trip_yaml_and_json() {
    for format in [ExportFormat::Yaml, ExportFormat::Json] {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let source_svc = service(src.path());
        let target_svc = service(dst.path());
        seed(source_svc.store());

        let snapshot = source_svc.export_snapshot(&ListFilter::new(), now()).unwrap();
        let mut buffer = Vec::new();
        let stats = export(&mut buffer, &snapshot, format).unwrap();
        assert_eq!(stats.exported, 3);

        let candidates = parse_source(&String::from_utf8(buffer).unwrap()).unwrap();
        let result = target_svc
            .import(&candidates, &ImportOptions::new(), now())
            .unwrap();
        assert_eq!(result.imported(), 3, "format {}", format);

        let imported = target_svc.store().list(&ListFilter::new()).unwrap();
        let expected: Vec<Instinct> = snapshot
            .iter()
            .map(|i| i.clone().with_source(Source::Inherited))
            .collect();
        assert_eq!(imported, expected, "format {}", format);
    }
}

/// Test the snapshot carries decayed confidence and is not decayed again.
#[test]
fn test_snapshot_is_decayed_once() {
    let tmp = TempDir::new().unwrap();
    let svc = service(tmp.path());
    seed(svc.store());

    let snapshot = svc.export_snapshot(&ListFilter::new(), now()).unwrap();
    let early = snapshot.iter().find(|i| i.id == "prefer-early-return").unwrap();
    assert!((early.confidence - 0.74).abs() < 1e-9);
    assert_eq!(DecayEngine::new(0.02).apply(early, now()), early.confidence);

    let stored = svc.store().get("prefer-early-return").unwrap();
    assert_eq!(stored.confidence, 0.8);
}

/// Test import never writes the personal store, even under force.
#[test]
fn test_import_isolation() {
    let tmp = TempDir::new().unwrap();
    let svc = service(tmp.path());
    seed(svc.store());
    let before = snapshot_dir(&tmp.path().join("personal"));

    let candidates = vec![
        Instinct::new("prefer-early-return", "when writing new functions", "team version", 0.95),
        Instinct::new("squash-merge", "when merging", "squash", 0.6),
    ];
    let opts = ImportOptions::new().with_force(true);
    let result = svc.import(&candidates, &opts, now()).unwrap();

    assert_eq!(result.items[0].action, ImportAction::Overwrite);
    assert_eq!(result.items[1].action, ImportAction::New);
    assert_eq!(snapshot_dir(&tmp.path().join("personal")), before);

    // The personal record still shadows the inherited copy.
    let got = svc.store().get("prefer-early-return").unwrap();
    assert_eq!(got.source, Source::Personal);
    assert_eq!(got.action, "return early");

    let inherited = svc
        .store()
        .list(&ListFilter::new().with_source(Source::Inherited))
        .unwrap();
    let ids: Vec<&str> = inherited.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["prefer-early-return", "squash-merge"]);
}

/// Test a dry run classifies exactly like a real run and writes nothing.
#[test]
fn test_dry_run_equivalence() {
    let tmp = TempDir::new().unwrap();
    let svc = service(tmp.path());
    seed(svc.store());

    let candidates = vec![
        Instinct::new("run-linter", "before committing", "", 0.9),
        Instinct::new("weak", "when guessing", "", 0.2),
        Instinct::new("fresh", "when reviewing", "", 0.7),
    ];
    let base = ImportOptions::new().with_min_confidence(0.5);

    let before = snapshot_dir(&tmp.path().join("inherited"));
    let dry = svc
        .import(&candidates, &base.clone().with_dry_run(true), now())
        .unwrap();
    assert_eq!(snapshot_dir(&tmp.path().join("inherited")), before);

    let real = svc.import(&candidates, &base, now()).unwrap();
    let dry_actions: Vec<ImportAction> = dry.items.iter().map(|i| i.action).collect();
    let real_actions: Vec<ImportAction> = real.items.iter().map(|i| i.action).collect();
    assert_eq!(dry_actions, real_actions);
    assert_eq!(
        real_actions,
        vec![ImportAction::Skip, ImportAction::Skip, ImportAction::New]
    );
    assert_eq!(dry.imported(), real.imported());
}

/// Test every candidate is classified exactly once, in input order.
#[test]
fn test_classification_completeness() {
    let tmp = TempDir::new().unwrap();
    let svc = service(tmp.path());
    seed(svc.store());

    let candidates: Vec<Instinct> = (0..12)
        .map(|n| {
            let id = if n % 4 == 0 {
                "table-tests".to_string()
            } else {
                format!("candidate-{:02}", n)
            };
            Instinct::new(id, "when testing", "", n as f64 / 12.0)
        })
        .collect();

    for opts in [
        ImportOptions::new(),
        ImportOptions::new().with_force(true),
        ImportOptions::new().with_min_confidence(0.5).with_dry_run(true),
    ] {
        let result = svc.import(&candidates, &opts, now()).unwrap();
        assert_eq!(result.items.len(), candidates.len());
        for (item, candidate) in result.items.iter().zip(&candidates) {
            assert_eq!(item.instinct.id, candidate.id);
        }
        assert_eq!(result.imported() + result.skipped(), candidates.len());
    }
}

/// Test the confidence floor is checked against decayed values.
#[test]
fn test_status_min_confidence_after_decay() {
    let tmp = TempDir::new().unwrap();
    let svc = service(tmp.path());
    svc.store()
        .save(
            &Instinct::new("stale", "when deploying", "", 0.8)
                .with_domain("ops")
                .with_updated_at(now() - Duration::weeks(10)),
        )
        .unwrap();

    let at_floor = svc
        .status(&ListFilter::new().with_min_confidence(0.7), now())
        .unwrap();
    assert!(at_floor.is_empty());

    let all = svc.status(&ListFilter::new(), now()).unwrap();
    assert_eq!(all.len(), 1);
    assert!((all[0].confidence - 0.6).abs() < 1e-9);
    assert_eq!(svc.store().get("stale").unwrap().confidence, 0.8);
}

/// Test imported records land decayed and a floor uses the decayed value.
#[test]
fn test_import_applies_decay_before_floor() {
    let tmp = TempDir::new().unwrap();
    let svc = service(tmp.path());

    let old = Instinct::new("old", "when deploying", "", 0.6)
        .with_updated_at(now() - Duration::weeks(6));
    let opts = ImportOptions::new().with_min_confidence(0.5);
    let result = svc.import(&[old.clone()], &opts, now()).unwrap();
    assert_eq!(result.items[0].action, ImportAction::Skip);

    let result = svc.import(&[old], &ImportOptions::new(), now()).unwrap();
    assert_eq!(result.imported(), 1);
    let stored = svc.store().get("old").unwrap();
    assert!((stored.confidence - 0.48).abs() < 1e-9);
    assert_eq!(stored.source, Source::Inherited);
}

/// Test malformed import sources fail as a whole.
#[test]
fn test_malformed_source_is_error() {
    assert!(parse_source("---\nid: a\nconfidence: high\n---\n").is_err());
    assert!(parse_source("[{\"id\": \"a\"}]").is_err());
    assert!(render(&[Instinct::new("a", "t", "", 0.5)], ExportFormat::Yaml).is_ok());
}
