use super::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

fn fresh_workbook() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("Donnees_Tirage.xlsx");
    init(&path, false).unwrap();
    (temp_dir, path)
}

fn matrice_only(text: &str) -> SeriesInput {
    SeriesInput {
        matrice: text.to_string(),
        ..SeriesInput::default()
    }
}

// =========================================================================
// format_numbers Tests
// =========================================================================

#[test]
fn test_format_numbers() {
    assert_eq!(format_numbers(&[1, 2, 30]), "[1, 2, 30]");
    assert_eq!(format_numbers(&[]), "[]");
}

// =========================================================================
// SeriesInput Tests
// =========================================================================

#[test]
fn test_series_input_trims_fields() {
    let input = SeriesInput {
        matrice: " 123,456 ".to_string(),
        event: "9\n".to_string(),
        ..SeriesInput::default()
    };
    let series = input.into_series(day(1));
    assert_eq!(series.matrice, "123,456");
    assert_eq!(series.event, "9");
    assert_eq!(series.date, day(1));
}

// =========================================================================
// series / predict Tests
// =========================================================================

#[test]
fn test_series_records_row_and_prediction() {
    let (_dir, path) = fresh_workbook();
    let settings = PredictorSettings::default();

    let numbers = series(
        &path,
        day(1),
        matrice_only("123,456"),
        PolicyKind::Frequency,
        &settings,
    )
    .unwrap();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

    let store = WorkbookStore::open(&path).unwrap();
    assert_eq!(store.ledger().series.len(), 1);
    assert_eq!(
        store.ledger().prediction_for(day(1)).unwrap().numbers,
        vec![1, 2, 3, 4, 5]
    );
}

#[test]
fn test_series_twice_same_day_keeps_latest() {
    let (_dir, path) = fresh_workbook();
    let settings = PredictorSettings::default();

    series(&path, day(2), matrice_only("111"), PolicyKind::Frequency, &settings).unwrap();
    series(&path, day(2), matrice_only("789"), PolicyKind::Frequency, &settings).unwrap();

    let store = WorkbookStore::open(&path).unwrap();
    assert_eq!(store.ledger().series.len(), 1);
    assert_eq!(store.ledger().series_for(day(2)).unwrap().matrice, "789");
    assert_eq!(store.ledger().predictions.len(), 1);
}

#[test]
fn test_series_random_policy_with_seed() {
    let (_dir, path) = fresh_workbook();
    let settings = PredictorSettings {
        seed: Some(11),
        ..PredictorSettings::default()
    };

    let numbers = series(
        &path,
        day(3),
        SeriesInput::default(),
        PolicyKind::Random,
        &settings,
    )
    .unwrap();
    assert_eq!(numbers.len(), 5);
    assert!(numbers.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_series_on_missing_workbook_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.xlsx");
    let err = series(
        &path,
        day(1),
        SeriesInput::default(),
        PolicyKind::Frequency,
        &PredictorSettings::default(),
    )
    .unwrap_err();
    assert!(matches!(err, TirageError::WorkbookNotFound(_)));
}

#[test]
fn test_predict_without_series_is_not_found() {
    let (_dir, path) = fresh_workbook();
    let err = predict(
        &path,
        day(4),
        PolicyKind::Frequency,
        &PredictorSettings::default(),
    )
    .unwrap_err();
    assert!(matches!(err, TirageError::NotFound(_)));
}

#[test]
fn test_predict_uses_stored_series() {
    let (_dir, path) = fresh_workbook();
    let settings = PredictorSettings::default();
    series(&path, day(5), matrice_only("987"), PolicyKind::Random, &settings).unwrap();

    let numbers = predict(&path, day(5), PolicyKind::Frequency, &settings).unwrap();
    assert_eq!(numbers, vec![7, 8, 9, 87, 98]);

    let store = WorkbookStore::open(&path).unwrap();
    assert_eq!(store.ledger().predictions.len(), 1);
    assert_eq!(
        store.ledger().prediction_for(day(5)).unwrap().numbers,
        numbers
    );
}

#[test]
fn test_series_over_workbook_with_repeated_date() {
    let (_dir, path) = fresh_workbook();
    let mut ledger = crate::types::Ledger::new();
    ledger.series = vec![
        DailySeries::empty(day(6)).with(Source::Matrice, "111"),
        DailySeries::empty(day(6)).with(Source::Matrice, "222"),
    ];
    ledger.predictions = vec![
        Prediction::new(day(6), vec![1]).unwrap(),
        Prediction::new(day(6), vec![2]).unwrap(),
    ];
    crate::excel::WorkbookExporter::new(&ledger)
        .export(&path)
        .unwrap();

    series(
        &path,
        day(6),
        matrice_only("987"),
        PolicyKind::Frequency,
        &PredictorSettings::default(),
    )
    .unwrap();

    let store = WorkbookStore::open(&path).unwrap();
    assert_eq!(store.ledger().series.len(), 1);
    assert_eq!(store.ledger().series_for(day(6)).unwrap().matrice, "987");
    assert_eq!(store.ledger().predictions.len(), 1);
    assert_eq!(
        store.ledger().prediction_for(day(6)).unwrap().numbers,
        vec![7, 8, 9, 87, 98]
    );
}

// =========================================================================
// result / show / history Tests
// =========================================================================

#[test]
fn test_result_scores_against_prediction() {
    let (_dir, path) = fresh_workbook();
    let settings = PredictorSettings::default();
    series(&path, day(6), matrice_only("123,456"), PolicyKind::Frequency, &settings).unwrap();

    let score = result(&path, day(6), &[1, 3, 50, 60, 70]).unwrap();
    assert_eq!(score, Some(2));

    let report = show(&path, day(6), false).unwrap();
    assert_eq!(report.score, Some(2));
    assert_eq!(report.matched, vec![1, 3]);
}

#[test]
fn test_result_without_prediction_has_no_score() {
    let (_dir, path) = fresh_workbook();
    assert_eq!(result(&path, day(7), &[1, 2, 3, 4, 5]).unwrap(), None);
}

#[test]
fn test_result_rejects_out_of_range() {
    let (_dir, path) = fresh_workbook();
    let err = result(&path, day(7), &[1, 2, 3, 4, 100]).unwrap_err();
    assert!(matches!(err, TirageError::Validation(_)));
}

#[test]
fn test_show_empty_day() {
    let (_dir, path) = fresh_workbook();
    let report = show(&path, day(8), true).unwrap();
    assert_eq!(report.series, None);
    assert_eq!(report.prediction, None);
    assert_eq!(report.score, None);
}

#[test]
fn test_history_over_several_days() {
    let (_dir, path) = fresh_workbook();
    let settings = PredictorSettings::default();
    series(&path, day(9), matrice_only("123,456"), PolicyKind::Frequency, &settings).unwrap();
    series(&path, day(10), matrice_only("123,456"), PolicyKind::Frequency, &settings).unwrap();
    result(&path, day(9), &[1, 2, 3, 40, 50]).unwrap();
    result(&path, day(10), &[10, 20, 30, 40, 50]).unwrap();

    let h = history(&path, false).unwrap();
    assert_eq!(h.days_scored(), 2);
    assert_eq!(h.total_hits, 3);
    assert_eq!(h.best, Some((day(9), 3)));
}

// =========================================================================
// save failure Tests
// =========================================================================

#[test]
fn test_save_failure_warns_and_propagates() {
    let (_dir, path) = fresh_workbook();
    let store = WorkbookStore::open(&path).unwrap();

    // A directory in place of the file makes the rewrite fail, even as root
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    let err = save(&store).unwrap_err();
    let warning = save_warning(&path, &err);
    assert!(warning.contains("Could not save"));
    assert!(warning.contains(&path.display().to_string()));
    assert!(warning.contains("Changes from this run were not written"));
}

// =========================================================================
// extract Tests
// =========================================================================

#[test]
fn test_extract_text_modes() {
    assert_eq!(
        extract_text("123,456", ExtractionMode::Unite),
        vec![1, 2, 3, 4, 5, 6]
    );
    assert_eq!(
        extract_text("123,456", ExtractionMode::Couple),
        vec![12, 23, 45, 56]
    );
    assert!(extract_text("hello", ExtractionMode::Unite).is_empty());
}
