mod parser;

use std::io::Read;
use std::path::Path;

use super::domain::Answers;

/// One respondent's answers from a bulk export.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSheet {
    pub respondent: String,
    pub answers: Answers,
}

#[derive(Debug)]
pub enum BatchImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for BatchImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchImportError::Io(err) => write!(f, "failed to read answer export: {}", err),
            BatchImportError::Csv(err) => write!(f, "invalid answer CSV data: {}", err),
        }
    }
}

impl std::error::Error for BatchImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchImportError::Io(err) => Some(err),
            BatchImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BatchImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads answer sheets from CSV: one header per fact key, one row per
/// respondent, and an optional `respondent` column.
pub struct AnswerSheetImporter;

impl AnswerSheetImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<AnswerSheet>, BatchImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<AnswerSheet>, BatchImportError> {
        Ok(parser::parse_sheets(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::domain::AnswerValue;
    use std::io::Cursor;

    #[test]
    fn header_normalization_strips_bom_and_case() {
        assert_eq!(parser::normalize_header_for_tests("\u{feff} Sleep_Problems "), "sleep_problems");
    }

    #[test]
    fn rows_become_answer_sheets() {
        let csv = "respondent,sleep_problems,anxiety_symptoms\n\
ana,1,\"1,3\"\n\
,2,2\n";
        let sheets = AnswerSheetImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].respondent, "ana");
        assert_eq!(
            sheets[0].answers.get("anxiety_symptoms"),
            Some(&AnswerValue::Text("1,3".into()))
        );
        assert_eq!(sheets[1].respondent, "row-2");
        assert!(!sheets[1].answers.contains_key("respondent"));
    }

    #[test]
    fn empty_cells_are_left_unanswered() {
        let sheets = AnswerSheetImporter::from_reader(Cursor::new("sleep_problems,daytime_impact\n1,\n"))
            .expect("import succeeds");

        assert_eq!(sheets[0].answers.len(), 1);
        assert!(sheets[0].answers.contains_key("sleep_problems"));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let error = AnswerSheetImporter::from_reader(Cursor::new("a,b\n1,2,3\n"))
            .expect_err("row has too many fields");
        assert!(matches!(error, BatchImportError::Csv(_)));
    }
}
