use std::io::Read;

use crate::diagnostics::domain::{AnswerValue, Answers};

use super::AnswerSheet;

const RESPONDENT_COLUMN: &str = "respondent";

pub(crate) fn parse_sheets<R: Read>(reader: R) -> Result<Vec<AnswerSheet>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let mut sheets = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let mut respondent = None;
        let mut answers = Answers::new();

        for (header, cell) in headers.iter().zip(record.iter()) {
            if cell.is_empty() || header.is_empty() {
                continue;
            }
            if header == RESPONDENT_COLUMN {
                respondent = Some(cell.to_string());
            } else {
                answers.insert(header.clone(), AnswerValue::Text(cell.to_string()));
            }
        }

        sheets.push(AnswerSheet {
            respondent: respondent.unwrap_or_else(|| format!("row-{}", row + 1)),
            answers,
        });
    }

    Ok(sheets)
}

fn normalize_header(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
pub(crate) fn normalize_header_for_tests(value: &str) -> String {
    normalize_header(value)
}
