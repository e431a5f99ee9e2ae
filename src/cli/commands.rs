use crate::core::{
    self, extract, frequency_table, DayReport, ExtractionMode, PolicyKind, PredictorSettings,
    ScoreHistory, ValueRange,
};
use crate::error::{TirageError, TirageResult};
use crate::store::WorkbookStore;
use crate::types::{DailySeries, DrawResult, Prediction, Source};
use chrono::NaiveDate;
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// Format numbers for display: `[1, 2, 3]`
fn format_numbers(numbers: &[u8]) -> String {
    let inner: Vec<String> = numbers.iter().map(|n| n.to_string()).collect();
    format!("[{}]", inner.join(", "))
}

/// Raw text of the five source fields, as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesInput {
    pub matrice: String,
    pub clavier: String,
    pub cerveau: String,
    pub code: String,
    pub event: String,
}

impl SeriesInput {
    pub fn into_series(self, date: NaiveDate) -> DailySeries {
        DailySeries::empty(date)
            .with(Source::Matrice, self.matrice.trim())
            .with(Source::Clavier, self.clavier.trim())
            .with(Source::Cerveau, self.cerveau.trim())
            .with(Source::Code, self.code.trim())
            .with(Source::Event, self.event.trim())
    }
}

fn print_title(title: &str, workbook: &Path) {
    println!("{}", format!("🔮 Tirage - {}", title).bold().green());
    println!("   Workbook: {}", workbook.display());
    println!();
}

/// Save, turning a failure into a visible warning before propagating it
fn save(store: &WorkbookStore) -> TirageResult<()> {
    match store.save() {
        Ok(()) => {
            println!("{}", "✅ Workbook saved".green());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", save_warning(store.path(), &e).yellow());
            Err(e)
        }
    }
}

fn save_warning(path: &Path, err: &TirageError) -> String {
    format!(
        "⚠️  Could not save {}: {}\n   Changes from this run were not written",
        path.display(),
        err
    )
}

fn run_policy(series: &DailySeries, policy: PolicyKind, settings: &PredictorSettings) -> Vec<u8> {
    let mut predictor = policy.build(settings);
    let numbers = predictor.predict(series);
    info!(policy = predictor.name(), date = %series.date, ?numbers, "prediction generated");
    numbers
}

/// Execute the init command - create an empty workbook
pub fn init(workbook: &Path, force: bool) -> TirageResult<()> {
    print_title("Init", workbook);
    WorkbookStore::init(workbook, force)?;
    println!("{}", "✅ Workbook created with sheets:".bold().green());
    for sheet in [
        crate::excel::RESULTS_SHEET,
        crate::excel::SERIES_SHEET,
        crate::excel::PREDICTIONS_SHEET,
    ] {
        println!("   📄 {}", sheet.bright_blue());
    }
    Ok(())
}

/// Execute the series command - record the day's series and predict from it
pub fn series(
    workbook: &Path,
    date: NaiveDate,
    input: SeriesInput,
    policy: PolicyKind,
    settings: &PredictorSettings,
) -> TirageResult<Vec<u8>> {
    print_title("Daily series", workbook);
    let mut store = WorkbookStore::open(workbook)?;

    let series = input.into_series(date);
    let numbers = run_policy(&series, policy, settings);
    println!(
        "🎯 Prediction for {} ({}): {}",
        date.to_string().bright_blue(),
        policy,
        format_numbers(&numbers).bold()
    );

    store.record_series(series);
    store.record_prediction(Prediction::new(date, numbers.clone())?);
    save(&store)?;
    Ok(numbers)
}

/// Execute the predict command - predict from an already recorded series
pub fn predict(
    workbook: &Path,
    date: NaiveDate,
    policy: PolicyKind,
    settings: &PredictorSettings,
) -> TirageResult<Vec<u8>> {
    print_title("Predict", workbook);
    let mut store = WorkbookStore::open(workbook)?;

    let series = match store.ledger().series_for(date) {
        Some(s) => s.clone(),
        None => {
            eprintln!(
                "{}",
                format!(
                    "⚠️  No series recorded for {}. Enter it with `tirage series` first.",
                    date
                )
                .yellow()
            );
            return Err(TirageError::NotFound(format!("no series for {}", date)));
        }
    };

    let numbers = run_policy(&series, policy, settings);
    println!(
        "🎯 Prediction for {} ({}): {}",
        date.to_string().bright_blue(),
        policy,
        format_numbers(&numbers).bold()
    );

    store.record_prediction(Prediction::new(date, numbers.clone())?);
    save(&store)?;
    Ok(numbers)
}

/// Execute the result command - record the drawn numbers.
///
/// Returns the score of the day's prediction, if one exists.
pub fn result(workbook: &Path, date: NaiveDate, numbers: &[u8]) -> TirageResult<Option<usize>> {
    print_title("Result", workbook);
    let mut store = WorkbookStore::open(workbook)?;

    let drawn = DrawResult::new(date, numbers)?;
    println!(
        "📊 Result for {}: {}",
        date.to_string().bright_blue(),
        format_numbers(&drawn.numbers).bold()
    );
    store.record_result(drawn);
    save(&store)?;

    let report = core::compare(store.ledger(), date);
    if let Some(score) = report.score {
        println!(
            "   Matched {} with the prediction {}",
            format!("{}/5", score).bold(),
            format_numbers(&report.matched)
        );
    }
    Ok(report.score)
}

/// Execute the show command - prediction, result and score for a date
pub fn show(workbook: &Path, date: NaiveDate, json: bool) -> TirageResult<DayReport> {
    let store = WorkbookStore::open(workbook)?;
    let report = core::compare(store.ledger(), date);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report);
    }

    print_title("Show", workbook);
    println!("📅 {}", date.to_string().bold().bright_blue());

    match &report.series {
        Some(series) => {
            println!("   📩 Series:");
            for source in Source::ALL {
                let text = series.field(source);
                println!(
                    "      {:<8} {}",
                    source.to_string().cyan(),
                    if text.is_empty() { "-" } else { text }
                );
            }
        }
        None => println!("   📩 Series: {}", "none".dimmed()),
    }

    match &report.prediction {
        Some(p) => println!("   🎯 Prediction: {}", format_numbers(p).bold()),
        None => println!("   🎯 Prediction: {}", "none".dimmed()),
    }
    match &report.result {
        Some(r) => println!("   📊 Result:     {}", format_numbers(r).bold()),
        None => println!("   📊 Result:     {}", "not drawn yet".dimmed()),
    }
    if let Some(score) = report.score {
        let text = format!("{}/5 {}", score, format_numbers(&report.matched));
        let text = if score > 0 { text.green() } else { text.red() };
        println!("   ✅ Score:      {}", text.bold());
    }
    Ok(report)
}

/// Execute the history command - scores for every scored date
pub fn history(workbook: &Path, json: bool) -> TirageResult<ScoreHistory> {
    let store = WorkbookStore::open(workbook)?;
    let history = core::history(store.ledger());

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(history);
    }

    print_title("History", workbook);
    if history.days.is_empty() {
        println!("{}", "No date has both a prediction and a result yet".yellow());
        return Ok(history);
    }

    println!(
        "   {:<12} {:<22} {:<22} {}",
        "Date".bold(),
        "Prediction".bold(),
        "Result".bold(),
        "Score".bold()
    );
    println!("   {}", "─".repeat(64));
    for day in &history.days {
        println!(
            "   {:<12} {:<22} {:<22} {}",
            day.date.to_string(),
            format_numbers(day.prediction.as_deref().unwrap_or_default()),
            format_numbers(day.result.as_deref().unwrap_or_default()),
            day.score.unwrap_or(0)
        );
    }
    println!("   {}", "─".repeat(64));
    println!(
        "   {} days scored, {} hits in total",
        history.days_scored(),
        history.total_hits
    );
    if let Some(mean) = history.mean_hits() {
        println!("   Mean hits per day: {:.2}", mean);
    }
    if let Some((date, score)) = history.best {
        println!("   Best day: {} ({}/5)", date, score);
    }
    Ok(history)
}

/// Execute the extract command - show what the extractor sees in a string
pub fn extract_text(text: &str, mode: ExtractionMode) -> Vec<u8> {
    let values = extract(text, mode, ValueRange::default());
    println!("{}", "🔢 Tirage - Extract".bold().green());
    println!("   Input: {:?}", text);
    println!("   Mode:  {}", mode);
    println!("   Values ({}): {}", values.len(), format_numbers(&values).bold());

    // Counts as the frequency policy sees them
    let scratch = DailySeries::empty(NaiveDate::MIN).with(Source::Matrice, text);
    let table = frequency_table(&scratch, &[Source::Matrice]);
    if !table.is_empty() {
        println!();
        println!("   {:<6} {:<6} {}", "Value".bold(), "Unite".bold(), "Couple".bold());
        for (value, counts) in &table {
            println!("   {:<6} {:<6} {}", value, counts.unite, counts.couple);
        }
    }
    values
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
