//! Integration tests for `text_profile`.
//
// This suite verifies:
// - Library behavior (language detection, tokens, statistics invariants, sentiment fallback)
// - CLI behavior including export formats, chart output and failure on bad input
//
// Notes:
// - CLI tests run the binary with a per-process working directory (no global CWD change).
// - Tests that change global CWD (library-level outputs into ".") are marked #[serial].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use assert_fs::prelude::*;
use predicates::prelude::*;
use regex::Regex;
use serde_json::Value as Json;
use serial_test::serial;
use tempfile::tempdir;

use text_profile::sentiment::PolarityScorer;
use text_profile::{
    AlphabeticTokenizer, AnalysisOptions, Analyzer, ChineseStrategy, DEFAULT_SENTIMENT_PROFILE,
    Diagnostic, EnglishStrategy, ExportFormat, Keyword, Language, Polarity, SentimentEngine,
    SentimentModelFailure, Tokenizer, Tokenizers, analyze_file, export_report, generate_chart,
    run,
};

const ENGLISH: &str = "I love this, it is wonderful and great";
const CHINESE: &str = "我爱这个产品";

// --------------------- helpers ---------------------

/// Create a file with content in a temp dir.
fn write_file(dir: &assert_fs::TempDir, name: &str, content: &str) -> PathBuf {
    let f = dir.child(name);
    f.write_str(content).unwrap();
    f.path().to_path_buf()
}

/// Read file to string.
fn read_to_string<P: AsRef<Path>>(p: P) -> String {
    fs::read_to_string(p).unwrap()
}

/// Run CLI successfully with a specific working directory.
fn run_cli_ok_in(dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("text_profile").unwrap();
    cmd.current_dir(dir);
    cmd.args(args).assert().success()
}

/// Run CLI expecting failure with a specific working directory.
fn run_cli_fail_in(dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("text_profile").unwrap();
    cmd.current_dir(dir);
    cmd.args(args).assert().failure()
}

/// Names of all files in `dir`, sorted.
fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

struct Unavailable;

impl PolarityScorer for Unavailable {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn polarity(&self, _text: &str) -> Result<f64, SentimentModelFailure> {
        Err(SentimentModelFailure::Model {
            model: "unavailable",
            message: "model not loaded".into(),
        })
    }
}

/// Analyzer whose English polarity model always fails.
fn analyzer_with_failing_model() -> Analyzer {
    let alpha: Arc<dyn Tokenizer> = Arc::new(AlphabeticTokenizer);
    let tokenizers = Tokenizers {
        alphabetic: alpha.clone(),
        logographic: alpha.clone(),
    };
    let english = EnglishStrategy {
        polarity: Arc::new(Unavailable),
        ..EnglishStrategy::default()
    };
    let engine = SentimentEngine::new(ChineseStrategy::with_segmenter(alpha), english);
    Analyzer::new(tokenizers, engine)
}

// --------------------- library tests ---------------------

#[test]
fn lib_english_scenario() {
    let dir = assert_fs::TempDir::new().unwrap();
    let path = write_file(&dir, "en.txt", ENGLISH);
    let r = analyze_file(&path).unwrap();

    assert_eq!(r.language, Language::En);
    assert_eq!(
        r.tokens,
        ["i", "love", "this", "it", "is", "wonderful", "and", "great"]
    );
    assert_eq!(r.sentiment.polarity, Polarity::Positive);
    assert_eq!(r.file_size_bytes, ENGLISH.len() as u64);
    assert_eq!(r.char_count, ENGLISH.chars().count());
    assert_eq!(
        r.sentiment.keywords,
        vec![Keyword::new("wonderful", "JJ"), Keyword::new("great", "JJ")]
    );
}

#[test]
fn lib_chinese_scenario() {
    let dir = assert_fs::TempDir::new().unwrap();
    let path = write_file(&dir, "zh.txt", CHINESE);
    let r = analyze_file(&path).unwrap();

    assert_eq!(r.language, Language::Zh);
    assert!(!r.tokens.is_empty());
    assert_eq!(r.tokens.concat(), CHINESE);
    assert!((0.0..=1.0).contains(&r.sentiment.score));
    assert_eq!(r.sentiment.polarity, Polarity::from_score(r.sentiment.score));
    // no adjective in this sentence
    assert!(r.sentiment.keywords.is_empty());
    // UTF-8 size is larger than the character count for CJK text
    assert_eq!(r.char_count, 6);
    assert_eq!(r.file_size_bytes, 18);
}

#[test]
fn lib_chinese_keywords_keep_document_order() {
    let dir = assert_fs::TempDir::new().unwrap();
    let path = write_file(&dir, "review.txt", "这个产品很漂亮，我很满意");
    let r = analyze_file(&path).unwrap();

    assert_eq!(r.language, Language::Zh);
    assert_eq!(r.sentiment.polarity, Polarity::Positive);
    assert_eq!(
        r.sentiment.keywords,
        vec![Keyword::new("漂亮", "a"), Keyword::new("满意", "a")]
    );
}

#[test]
fn lib_invariants_hold_for_mixed_inputs() {
    let dir = assert_fs::TempDir::new().unwrap();
    let inputs = [
        ("a.txt", "The the THE cat.\nA dog!\r\nmp3 42"),
        ("b.txt", ""),
        ("c.txt", "这个产品很漂亮，我很满意。\n质量也不错"),
        ("d.txt", "Terrible service, awful food and I hate waiting"),
    ];
    for (name, content) in inputs {
        let path = write_file(&dir, name, content);
        let r = analyze_file(&path).unwrap();
        assert_eq!(r.token_count, r.tokens.len(), "{name}");
        assert_eq!(
            r.frequency.values().map(|c| *c as usize).sum::<usize>(),
            r.token_count,
            "{name}"
        );
        for t in &r.tokens {
            assert!(r.frequency.contains_key(t), "{name}: {t}");
        }
        assert_eq!(r.frequency.len(), {
            let mut distinct = r.tokens.clone();
            distinct.sort();
            distinct.dedup();
            distinct.len()
        });
        assert_eq!(r.sentiment.polarity, Polarity::from_score(r.sentiment.score));
    }
}

#[test]
fn lib_analysis_is_idempotent() {
    let dir = assert_fs::TempDir::new().unwrap();
    let en = write_file(&dir, "en.txt", ENGLISH);
    let zh = write_file(&dir, "zh.txt", "这个产品很漂亮，我很满意");
    assert_eq!(analyze_file(&en).unwrap(), analyze_file(&en).unwrap());
    assert_eq!(analyze_file(&zh).unwrap(), analyze_file(&zh).unwrap());
}

#[test]
fn lib_missing_file_is_io_failure() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let options = AnalysisOptions {
        export_format: ExportFormat::Pdf,
        out_dir: out.clone(),
        ..AnalysisOptions::default()
    };
    let mut sink: Vec<Diagnostic> = Vec::new();
    let err = run(&dir.path().join("missing.txt"), &options, &mut sink).unwrap_err();
    assert!(err.is_io_failure());
    assert!(sink.is_empty());
    // nothing downstream ran
    assert!(!out.exists());
}

#[test]
fn lib_model_failure_falls_back_to_default_profile() {
    let dir = assert_fs::TempDir::new().unwrap();
    let path = write_file(&dir, "en.txt", ENGLISH);
    let mut sink: Vec<Diagnostic> = Vec::new();
    let r = analyzer_with_failing_model()
        .analyze_file(&path, &mut sink)
        .unwrap();

    assert_eq!(r.sentiment, DEFAULT_SENTIMENT_PROFILE);
    assert_eq!(r.sentiment.score, 0.5);
    assert_eq!(r.sentiment.polarity, Polarity::Neutral);
    assert!(r.sentiment.keywords.is_empty());
    assert_eq!(r.token_count, 8);
    assert_eq!(sink.len(), 1);
    assert!(sink[0].to_string().contains("model not loaded"));

    // downstream stages still work on the neutral result
    let out = tempdir().unwrap();
    let chart = generate_chart(&r, out.path()).unwrap();
    assert!(chart.is_some());
    let report = export_report(&r, ExportFormat::Csv, chart.as_ref(), out.path(), false)
        .unwrap()
        .unwrap();
    assert!(read_to_string(report).contains("Sentiment polarity,neutral"));
}

#[test]
#[serial]
fn lib_run_writes_into_current_dir() {
    let input = assert_fs::TempDir::new().unwrap();
    let path = write_file(&input, "en.txt", ENGLISH);
    let work = tempdir().unwrap();
    let old = std::env::current_dir().unwrap();
    std::env::set_current_dir(work.path()).unwrap();

    let options = AnalysisOptions {
        export_format: ExportFormat::Json,
        ..AnalysisOptions::default()
    };
    let outcome = run(&path, &options, &mut Vec::new());
    std::env::set_current_dir(old).unwrap();

    let report = outcome.unwrap();
    assert_eq!(report.report, Some(PathBuf::from("./report.json")));
    assert_eq!(file_names(work.path()), vec!["analysis_result.svg", "report.json"]);
}

// --------------------- CLI tests ---------------------

#[test]
fn cli_english_csv_report_and_chart() {
    let dir = assert_fs::TempDir::new().unwrap();
    write_file(&dir, "review.txt", ENGLISH);
    run_cli_ok_in(dir.path(), &["review.txt"])
        .stdout(predicate::str::contains("Language: English"))
        .stdout(predicate::str::contains("Sentiment: positive"))
        .stdout(predicate::str::contains("Report exported:"));

    let csv = read_to_string(dir.path().join("report.csv"));
    let mut rdr = csv::Reader::from_reader(csv.as_bytes());
    let rows: Vec<(String, String)> = rdr
        .records()
        .map(|r| {
            let r = r.unwrap();
            (r[0].to_string(), r[1].to_string())
        })
        .collect();
    assert_eq!(rows[0], ("File name".to_string(), "review.txt".to_string()));
    assert_eq!(rows[1].1, format!("{} bytes", ENGLISH.len()));
    assert_eq!(rows[4], ("Word count".to_string(), "8".to_string()));
    assert_eq!(rows[6], ("Sentiment polarity".to_string(), "positive".to_string()));

    let svg = read_to_string(dir.path().join("analysis_result.svg"));
    assert!(svg.contains("Top 10 Words"));
}

#[test]
fn cli_chinese_json_export() {
    let dir = assert_fs::TempDir::new().unwrap();
    write_file(&dir, "zh.txt", CHINESE);
    run_cli_ok_in(dir.path(), &["zh.txt", "--export-format", "json", "--out-dir", "out"])
        .stdout(predicate::str::contains("Language: Chinese"));

    let v: Json = serde_json::from_str(&read_to_string(dir.path().join("out/report.json"))).unwrap();
    assert_eq!(v["language"], "zh");
    let tokens: Vec<&str> = v["tokens"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_str().unwrap())
        .collect();
    assert_eq!(tokens.concat(), CHINESE);
    assert_eq!(v["token_count"].as_u64().unwrap() as usize, tokens.len());
    let sum: u64 = v["frequency"]
        .as_object()
        .unwrap()
        .values()
        .map(|c| c.as_u64().unwrap())
        .sum();
    assert_eq!(sum as usize, tokens.len());
    let intensity = &v["sentiment"]["intensity"];
    assert_eq!(intensity["positive"], 0.0);
    assert!(
        dir.path()
            .join("out")
            .join("analysis_result.svg")
            .exists()
    );
}

#[test]
fn cli_pdf_export() {
    let dir = assert_fs::TempDir::new().unwrap();
    write_file(&dir, "review.txt", "Good product.\nGreat price, but slow delivery.\n");
    run_cli_ok_in(dir.path(), &["review.txt", "--export-format", "pdf", "--no-chart"]);

    let bytes = fs::read(dir.path().join("report.pdf")).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    // the document report needs the chart even with --no-chart
    assert!(dir.path().join("analysis_result.svg").exists());
}

#[test]
fn cli_tsv_timestamped_name() {
    let dir = assert_fs::TempDir::new().unwrap();
    write_file(&dir, "a.txt", "one two two");
    run_cli_ok_in(dir.path(), &["a.txt", "--export-format", "tsv", "--timestamped"]);

    let re = Regex::new(r"^report_\d{8}_\d{6}\.tsv$").unwrap();
    let names = file_names(dir.path());
    let report = names.iter().find(|n| re.is_match(n));
    assert!(report.is_some(), "{names:?}");
    let tsv = read_to_string(dir.path().join(report.unwrap()));
    assert!(tsv.contains("Word count\t3"));
}

#[test]
fn cli_no_chart_and_no_report() {
    let dir = assert_fs::TempDir::new().unwrap();
    write_file(&dir, "a.txt", ENGLISH);
    run_cli_ok_in(dir.path(), &["a.txt", "--export-format", "none", "--no-chart"])
        .stdout(predicate::str::contains("Analysis result"))
        .stdout(predicate::str::contains("Report exported").not());
    assert_eq!(file_names(dir.path()), vec!["a.txt"]);
}

#[test]
fn cli_empty_file_skips_chart() {
    let dir = assert_fs::TempDir::new().unwrap();
    write_file(&dir, "empty.txt", "");
    run_cli_ok_in(dir.path(), &["empty.txt"]).stdout(predicate::str::contains("Chart saved").not());
    assert!(!dir.path().join("analysis_result.svg").exists());
    let csv = read_to_string(dir.path().join("report.csv"));
    assert!(csv.contains("Word count,0"));
}

#[test]
fn cli_csv_cells_are_sanitized() {
    let dir = assert_fs::TempDir::new().unwrap();
    write_file(&dir, "=cmd.txt", "fine words");
    run_cli_ok_in(dir.path(), &["=cmd.txt"]);
    let csv = read_to_string(dir.path().join("report.csv"));
    assert!(csv.contains("File name,'=cmd.txt"));
}

#[test]
fn cli_missing_file_fails_without_artifacts() {
    let dir = assert_fs::TempDir::new().unwrap();
    run_cli_fail_in(dir.path(), &["nope.txt", "--export-format", "pdf"])
        .stderr(predicate::str::contains("nope.txt"));
    assert!(file_names(dir.path()).is_empty());
}

#[test]
fn cli_binary_input_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("blob.txt").write_binary(&[0xff, 0xfe, 0xfd]).unwrap();
    run_cli_fail_in(dir.path(), &["blob.txt"]).stderr(predicate::str::contains("UTF-8"));
    assert_eq!(file_names(dir.path()), vec!["blob.txt"]);
}

#[test]
fn cli_rejects_unknown_format() {
    let dir = assert_fs::TempDir::new().unwrap();
    write_file(&dir, "a.txt", ENGLISH);
    run_cli_fail_in(dir.path(), &["a.txt", "--export-format", "docx"]);
}
