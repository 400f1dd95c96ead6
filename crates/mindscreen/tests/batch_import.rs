use std::io::Cursor;
use std::path::PathBuf;

use mindscreen::diagnostics::{
    AnswerSheetImporter, AnswerValue, BatchImportError, Condition, DiagnosticService,
    EvidencePolicy, SeverityBand,
};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/depression_answers.csv")
}

#[test]
fn importer_reads_respondents_and_normalizes_headers() {
    let sheets = AnswerSheetImporter::from_path(fixture()).expect("fixture imports");

    assert_eq!(sheets.len(), 4);
    assert_eq!(sheets[0].respondent, "r-001");
    assert_eq!(
        sheets[0].answers.get("factores_ambientales"),
        Some(&AnswerValue::Text("1".into()))
    );
    assert!(!sheets[2].answers.contains_key("cambios_hormonales"));
}

#[test]
fn batch_analysis_reports_each_sheet_independently() {
    let sheets = AnswerSheetImporter::from_path(fixture()).expect("fixture imports");
    let service = DiagnosticService::load(EvidencePolicy::Strict).expect("models load");

    let outcomes = service.analyze_batch(Condition::Depression, &sheets);
    assert_eq!(outcomes.len(), 4);

    let high = outcomes[0].report.as_ref().expect("complete sheet");
    assert_eq!(high.risk.map(|risk| risk.band), Some(SeverityBand::High));
    let low = outcomes[1].report.as_ref().expect("complete sheet");
    assert_eq!(low.risk.map(|risk| risk.probability), Some(0.12));

    let missing = outcomes[2].error.as_deref().expect("missing answer");
    assert!(missing.contains("cambios_hormonales"), "{missing}");
    assert!(outcomes[2].report.is_none());

    let invalid = outcomes[3].error.as_deref().expect("invalid option");
    assert!(invalid.contains("causas_psicologicas"), "{invalid}");
}

#[test]
fn importer_reports_unreadable_sources() {
    let error = AnswerSheetImporter::from_path(fixture().with_file_name("absent.csv"))
        .expect_err("file does not exist");
    assert!(matches!(error, BatchImportError::Io(_)));

    let error = AnswerSheetImporter::from_reader(Cursor::new("respondent,habitos\nr-1,1,2\n"))
        .expect_err("ragged row");
    assert!(matches!(error, BatchImportError::Csv(_)));
}
