use std::collections::BTreeMap;

use super::domain::{AnswerMode, AnswerValue, Answers, Condition, DiagnosticError, Question, Quiz};

/// Highest score a single scale item may carry.
pub const SCALE_ITEM_MAX: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactValue {
    /// 1-based option codes in answer order.
    Codes(Vec<u8>),
    Score(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub key: &'static str,
    pub value: FactValue,
}

/// Write-once fact store plus the stage token that drives the chain.
#[derive(Debug, Clone)]
pub struct WorkingMemory {
    condition: Condition,
    facts: BTreeMap<&'static str, Fact>,
    stage: Option<&'static str>,
}

impl WorkingMemory {
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            facts: BTreeMap::new(),
            stage: None,
        }
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn declare(&mut self, fact: Fact) -> Result<(), DiagnosticError> {
        if self.facts.contains_key(fact.key) {
            return Err(DiagnosticError::FactAlreadyDeclared(fact.key));
        }
        self.facts.insert(fact.key, fact);
        Ok(())
    }

    pub fn fact(&self, key: &'static str) -> Result<&Fact, DiagnosticError> {
        self.facts
            .get(key)
            .ok_or(DiagnosticError::MissingEvidence {
                condition: self.condition,
                key,
            })
    }

    pub fn codes(&self, key: &'static str) -> Result<&[u8], DiagnosticError> {
        match &self.fact(key)?.value {
            FactValue::Codes(codes) => Ok(codes),
            FactValue::Score(_) => Err(DiagnosticError::FactKind {
                key,
                expected: "option codes",
            }),
        }
    }

    /// First selected code of a choice fact.
    pub fn code(&self, key: &'static str) -> Result<u8, DiagnosticError> {
        self.codes(key)?
            .first()
            .copied()
            .ok_or(DiagnosticError::FactKind {
                key,
                expected: "a selected option",
            })
    }

    pub fn score(&self, key: &'static str) -> Result<u8, DiagnosticError> {
        match &self.fact(key)?.value {
            FactValue::Score(score) => Ok(*score),
            FactValue::Codes(_) => Err(DiagnosticError::FactKind {
                key,
                expected: "a scale score",
            }),
        }
    }

    pub fn stage(&self) -> Option<&'static str> {
        self.stage
    }

    pub(crate) fn assert_stage(&mut self, token: &'static str) {
        self.stage = Some(token);
    }

    pub fn clear(&mut self) {
        self.facts.clear();
        self.stage = None;
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// Decodes every quiz answer before anything is declared, so a bad payload
/// leaves working memory untouched.
pub(crate) fn facts_from_answers(
    quiz: &Quiz,
    condition: Condition,
    answers: &Answers,
) -> Result<Vec<Fact>, DiagnosticError> {
    quiz.questions
        .iter()
        .map(|question| {
            let raw = answers
                .get(question.fact_key)
                .ok_or(DiagnosticError::MissingEvidence {
                    condition,
                    key: question.fact_key,
                })?;
            let value = match question.answer_mode {
                AnswerMode::Single | AnswerMode::Multi => {
                    FactValue::Codes(decode_choice(question, raw)?)
                }
                AnswerMode::Scale => FactValue::Score(decode_scale(question, raw)?),
            };
            Ok(Fact {
                key: question.fact_key,
                value,
            })
        })
        .collect()
}

fn invalid(question: &Question, reason: String) -> DiagnosticError {
    DiagnosticError::InvalidAnswer {
        key: question.fact_key,
        reason,
    }
}

fn decode_choice(question: &Question, raw: &AnswerValue) -> Result<Vec<u8>, DiagnosticError> {
    let tokens = raw.tokens();
    if tokens.is_empty() {
        return Err(invalid(question, "no option selected".to_string()));
    }
    if question.answer_mode == AnswerMode::Single && tokens.len() > 1 {
        return Err(invalid(
            question,
            format!("expects exactly one option, got {raw}"),
        ));
    }

    let mut codes = Vec::with_capacity(tokens.len());
    for token in tokens {
        let code: u8 = token
            .parse()
            .map_err(|_| invalid(question, format!("'{token}' is not an option number")))?;
        if code == 0 || usize::from(code) > question.options.len() {
            return Err(invalid(
                question,
                format!("option {code} is outside 1..={}", question.options.len()),
            ));
        }
        if codes.contains(&code) {
            return Err(invalid(question, format!("option {code} selected twice")));
        }
        codes.push(code);
    }
    Ok(codes)
}

fn decode_scale(question: &Question, raw: &AnswerValue) -> Result<u8, DiagnosticError> {
    let item_count = question.options.len();
    let ceiling = item_count * usize::from(SCALE_ITEM_MAX);

    let itemized = match raw {
        AnswerValue::List(_) => true,
        AnswerValue::Text(text) => text.contains(','),
        AnswerValue::Number(_) => false,
    };

    let total = if itemized {
        let tokens = raw.tokens();
        if tokens.is_empty() {
            return Err(invalid(question, "no item scores given".to_string()));
        }
        if tokens.len() != item_count {
            return Err(invalid(
                question,
                format!("expects {item_count} item scores, got {}", tokens.len()),
            ));
        }
        let mut total = 0usize;
        for token in tokens {
            let item: u8 = token
                .parse()
                .map_err(|_| invalid(question, format!("'{token}' is not an item score")))?;
            if item > SCALE_ITEM_MAX {
                return Err(invalid(
                    question,
                    format!("item score {item} is outside 0..={SCALE_ITEM_MAX}"),
                ));
            }
            total += usize::from(item);
        }
        total
    } else {
        let tokens = raw.tokens();
        let token = tokens
            .first()
            .ok_or_else(|| invalid(question, "no score given".to_string()))?;
        token
            .parse::<usize>()
            .map_err(|_| invalid(question, format!("'{token}' is not a score")))?
    };

    if total > ceiling {
        return Err(invalid(
            question,
            format!("score {total} is outside 0..={ceiling}"),
        ));
    }
    u8::try_from(total).map_err(|_| invalid(question, format!("score {total} is too large")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUESTIONS: &[Question] = &[
        Question::single("sleep_problems", "¿Duerme mal?", &["Sí", "No"]),
        Question::multi("symptoms", "¿Qué síntomas?", &["A", "B", "C"]),
        Question::scale("isi_score", "Índice", &["1", "2", "3", "4", "5", "6", "7"]),
    ];
    static QUIZ: Quiz = Quiz::new(QUESTIONS);

    fn answers(pairs: &[(&str, AnswerValue)]) -> Answers {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn decodes_every_answer_mode() {
        let facts = facts_from_answers(
            &QUIZ,
            Condition::Insomnia,
            &answers(&[
                ("sleep_problems", "1".into()),
                ("symptoms", "3, 1".into()),
                (
                    "isi_score",
                    AnswerValue::List([4i64, 4, 2, 0, 0, 0, 0].map(AnswerValue::from).to_vec()),
                ),
            ]),
        )
        .expect("answers decode");

        assert_eq!(facts[0].value, FactValue::Codes(vec![1]));
        assert_eq!(facts[1].value, FactValue::Codes(vec![3, 1]));
        assert_eq!(facts[2].value, FactValue::Score(10));
    }

    #[test]
    fn reports_first_missing_answer_in_quiz_order() {
        let error = facts_from_answers(
            &QUIZ,
            Condition::Insomnia,
            &answers(&[("isi_score", 12i64.into())]),
        )
        .expect_err("answers are incomplete");

        match error {
            DiagnosticError::MissingEvidence { key, condition } => {
                assert_eq!(key, "sleep_problems");
                assert_eq!(condition, Condition::Insomnia);
            }
            other => panic!("expected missing evidence, got {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_and_multi_valued_single_answers() {
        for raw in ["3", "1,2", "yes", ""] {
            let error = facts_from_answers(
                &QUIZ,
                Condition::Insomnia,
                &answers(&[
                    ("sleep_problems", raw.into()),
                    ("symptoms", "1".into()),
                    ("isi_score", 0i64.into()),
                ]),
            )
            .expect_err("answer is invalid");
            assert!(
                matches!(error, DiagnosticError::InvalidAnswer { key: "sleep_problems", .. }),
                "unexpected error for {raw:?}: {error:?}"
            );
        }
    }

    #[test]
    fn rejects_scale_totals_above_ceiling() {
        let error = facts_from_answers(
            &QUIZ,
            Condition::Insomnia,
            &answers(&[
                ("sleep_problems", "1".into()),
                ("symptoms", "1".into()),
                ("isi_score", 29i64.into()),
            ]),
        )
        .expect_err("score exceeds the scale");
        assert!(matches!(
            error,
            DiagnosticError::InvalidAnswer { key: "isi_score", .. }
        ));
    }

    #[test]
    fn itemized_scores_need_every_item() {
        for raw in [
            AnswerValue::List(Vec::new()),
            AnswerValue::from(","),
            AnswerValue::from("4,4,4"),
        ] {
            let error = facts_from_answers(
                &QUIZ,
                Condition::Insomnia,
                &answers(&[
                    ("sleep_problems", "1".into()),
                    ("symptoms", "1".into()),
                    ("isi_score", raw.clone()),
                ]),
            )
            .expect_err("item scores are incomplete");
            assert!(
                matches!(error, DiagnosticError::InvalidAnswer { key: "isi_score", .. }),
                "unexpected error for {raw:?}: {error:?}"
            );
        }
    }

    #[test]
    fn facts_are_write_once() {
        let mut memory = WorkingMemory::new(Condition::Anxiety);
        let fact = Fact {
            key: "sleep_problems",
            value: FactValue::Codes(vec![1]),
        };
        memory.declare(fact.clone()).expect("first declaration");
        let error = memory.declare(fact).expect_err("duplicate declaration");
        assert!(matches!(error, DiagnosticError::FactAlreadyDeclared("sleep_problems")));

        memory.clear();
        assert!(memory.is_empty());
        assert_eq!(memory.stage(), None);
    }

    #[test]
    fn typed_accessors_reject_the_wrong_kind() {
        let mut memory = WorkingMemory::new(Condition::Insomnia);
        memory
            .declare(Fact {
                key: "isi_score",
                value: FactValue::Score(9),
            })
            .expect("declare score");

        assert_eq!(memory.score("isi_score").expect("score"), 9);
        assert!(matches!(
            memory.code("isi_score"),
            Err(DiagnosticError::FactKind { key: "isi_score", .. })
        ));
        assert!(matches!(
            memory.code("sleep_problems"),
            Err(DiagnosticError::MissingEvidence { key: "sleep_problems", .. })
        ));
    }
}
