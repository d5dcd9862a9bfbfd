//! Text and dataset paths of the analysis service

use sentiscope_analyzers::{AnalysisService, AnalyzerConfig};
use sentiscope_core::{Error, Sentiment};
use std::io::Write;

fn service() -> AnalysisService {
    AnalysisService::with_default_scorers().unwrap()
}

#[test]
fn test_positive_text_from_both_analyzers() {
    let report = service().analyze_text("I love this!").unwrap();

    assert_eq!(report.results.len(), 2);
    for name in ["VADER", "TextBlob"] {
        let result = report.get(name).unwrap();
        assert_eq!(result.label, Sentiment::Positive);
        assert!(result.confidence > 0.05);
    }
}

#[test]
fn test_negative_and_neutral_text() {
    let s = service();

    let report = s.analyze_text("This is a terrible, awful day").unwrap();
    assert_eq!(report.get("VADER").unwrap().label, Sentiment::Negative);
    assert_eq!(report.get("TextBlob").unwrap().label, Sentiment::Negative);

    let report = s.analyze_text("The train leaves at noon").unwrap();
    assert_eq!(report.get("VADER").unwrap().label, Sentiment::Neutral);
    assert_eq!(report.get("TextBlob").unwrap().label, Sentiment::Neutral);
}

#[test]
fn test_text_analysis_is_deterministic() {
    let s = service();
    let first = s.analyze_text("Not bad at all, really enjoyed it").unwrap();
    let second = s.analyze_text("Not bad at all, really enjoyed it").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_batch_row_json_shape() {
    let row = service().batch_row("I love this!").unwrap();
    let json = serde_json::to_string(&row).unwrap();

    assert!(json.starts_with(r#"{"Text":"I love this!","VADER Sentiment":"Positive ("#));
    assert!(json.contains(r#""TextBlob Sentiment":"Positive (62.0%)""#));
}

#[test]
fn test_csv_rows_preserve_order() {
    let csv = "id,text\n1,I love this!\n2,I hate this\n3,The sky is blue\n";
    let rows = service().analyze_csv(csv.as_bytes()).unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].text, "I love this!");
    assert_eq!(rows[1].text, "I hate this");
    assert_eq!(rows[2].text, "The sky is blue");

    assert!(rows[0].column("VADER").unwrap().starts_with("Positive"));
    assert!(rows[1].column("VADER").unwrap().starts_with("Negative"));
    assert_eq!(rows[2].column("TextBlob"), Some("Neutral (0.0%)"));
}

#[test]
fn test_csv_quoted_text_with_commas() {
    let csv = "text\n\"Great food, great service\"\n";
    let rows = service().analyze_csv(csv.as_bytes()).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].text, "Great food, great service");
}

#[test]
fn test_csv_short_rows_read_as_empty_text() {
    let csv = "id,text\n1\n2,good\n";
    let rows = service().analyze_csv(csv.as_bytes()).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].text, "");
    assert_eq!(rows[0].column("VADER"), Some("Neutral (0.0%)"));
}

#[test]
fn test_csv_without_text_column() {
    let csv = "id,body\n1,I love this!\n";
    let err = service().analyze_csv(csv.as_bytes()).unwrap_err();

    assert!(matches!(err, Error::MissingColumn(_)));
    assert_eq!(err.to_string(), "CSV must contain a 'text' column");
}

#[test]
fn test_csv_header_only_yields_no_rows() {
    let rows = service().analyze_csv("text\n".as_bytes()).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_csv_invalid_utf8_is_dataset_error() {
    let mut bytes = b"text\n".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe, 0xfd, b'\n']);
    let err = service().analyze_csv(bytes.as_slice()).unwrap_err();

    assert!(matches!(err, Error::Dataset(_)));
    assert!(!err.is_client_error());
}

#[test]
fn test_service_from_config_with_custom_lexicons() {
    let dir = tempfile::tempdir().unwrap();

    let vader_path = dir.path().join("vader.txt");
    let mut vader = std::fs::File::create(&vader_path).unwrap();
    writeln!(vader, "splendid\t3.0\t0.5\t[3, 3, 3]").unwrap();

    let textblob_path = dir.path().join("textblob.tsv");
    let mut textblob = std::fs::File::create(&textblob_path).unwrap();
    writeln!(textblob, "splendid\t0.9\t0.8\t1.0").unwrap();

    let yaml = format!(
        "vader_lexicon: {}\ntextblob_lexicon: {}\n",
        vader_path.display(),
        textblob_path.display()
    );
    let config = AnalyzerConfig::from_yaml(&yaml).unwrap();
    let service = AnalysisService::from_config(&config).unwrap();

    let report = service.analyze_text("splendid").unwrap();
    assert_eq!(report.get("VADER").unwrap().label, Sentiment::Positive);
    assert_eq!(report.get("TextBlob").unwrap().confidence, 0.9);

    // "love" is not in the custom lexicons
    let report = service.analyze_text("love").unwrap();
    assert_eq!(report.get("VADER").unwrap().label, Sentiment::Neutral);
}
