use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::diagnostics::assessment::Assessment;
use crate::diagnostics::domain::{
    Answers, Condition, DiagnosisResult, DiagnosticError, Question, Quiz,
};
use crate::diagnostics::evidence::EvidencePolicy;
use crate::diagnostics::facts::{facts_from_answers, WorkingMemory};
use crate::diagnostics::registry::ModelCatalog;
use crate::diagnostics::sequencer::{StageTrace, DONE};

use super::YES_NO;

const TRIAGE_STAGE: &str = "triage";

/// Yes/no screening answers that flag a condition, in report order.
const TRIAGE_FLAGS: &[(&str, Condition)] = &[
    ("anxiety", Condition::Anxiety),
    ("sleep_issues", Condition::Insomnia),
    ("irritability", Condition::Stress),
    ("mood", Condition::Depression),
];

pub static QUIZ: Quiz = Quiz {
    questions: &[
        Question::single(
            "age",
            "¿Cuál es su rango de edad?",
            &[
                "Menos de 18",
                "18-25",
                "26-35",
                "36-45",
                "46-55",
                "56-65",
                "Más de 65",
            ],
        ),
        Question::single(
            "gender",
            "¿Con qué género se identifica?",
            &["Masculino", "Femenino", "Otro", "Prefiero no decir"],
        ),
        Question::single(
            "medical_history",
            "¿Tiene antecedentes de enfermedades médicas relevantes?",
            YES_NO,
        ),
        Question::single(
            "medication",
            "¿Está tomando actualmente alguna medicación?",
            YES_NO,
        ),
        Question::single(
            "sleep_issues",
            "¿Tiene dificultades para dormir con frecuencia?",
            YES_NO,
        ),
        Question::single(
            "irritability",
            "¿Se siente irritable o tenso con frecuencia?",
            YES_NO,
        ),
        Question::single(
            "mood",
            "¿Se ha sentido decaído o sin interés por las cosas en las últimas semanas?",
            YES_NO,
        ),
        Question::single(
            "family_history",
            "¿Tiene antecedentes familiares de problemas de salud mental?",
            &["Sí", "No", "No estoy seguro"],
        ),
        Question::single(
            "appetite_weight_changes",
            "¿Ha notado cambios en su apetito o peso recientemente?",
            YES_NO,
        ),
        Question::single(
            "concentration_memory_problems",
            "¿Tiene problemas de concentración o de memoria?",
            YES_NO,
        ),
        Question::single(
            "anxiety",
            "¿Siente preocupación o nerviosismo excesivo con frecuencia?",
            YES_NO,
        ),
    ],
};

/// General triage questionnaire that flags conditions and can hand the
/// respondent over to condition-specific modules.
#[derive(Debug)]
pub struct ScreeningRouter {
    catalog: Arc<ModelCatalog>,
    policy: EvidencePolicy,
    memory: WorkingMemory,
    result: DiagnosisResult,
    flagged: Vec<Condition>,
}

impl ScreeningRouter {
    pub fn new(catalog: Arc<ModelCatalog>, policy: EvidencePolicy) -> Self {
        Self {
            catalog,
            policy,
            memory: WorkingMemory::new(Condition::Screening),
            result: DiagnosisResult::default(),
            flagged: Vec::new(),
        }
    }

    /// Conditions flagged by the last run, in report order.
    pub fn flagged(&self) -> &[Condition] {
        &self.flagged
    }

    /// Runs a fresh module for `condition` and appends its recommendations.
    pub fn redirect(
        &mut self,
        condition: Condition,
        answers: &Answers,
    ) -> Result<StageTrace, DiagnosticError> {
        if !condition.is_specific() {
            return Err(DiagnosticError::NotRedirectable(condition));
        }
        info!(%condition, "redirecting screening to condition module");
        let mut module = self.catalog.assessment(condition, self.policy)?;
        module.reset();
        module.input_data(answers)?;
        let trace = module.run()?;
        self.result
            .recommendations
            .extend(module.recommendations().iter().cloned());
        Ok(trace)
    }

    /// Redirects to every flagged condition that has follow-up answers.
    /// Flagged conditions without answers are skipped.
    pub fn redirect_flagged(
        &mut self,
        follow_ups: &BTreeMap<Condition, Answers>,
    ) -> Result<Vec<Condition>, DiagnosticError> {
        let mut visited = Vec::new();
        for condition in self.flagged.clone() {
            if let Some(answers) = follow_ups.get(&condition) {
                self.redirect(condition, answers)?;
                visited.push(condition);
            }
        }
        Ok(visited)
    }
}

impl Assessment for ScreeningRouter {
    fn condition(&self) -> Condition {
        Condition::Screening
    }

    fn reset(&mut self) {
        self.memory.clear();
        self.result = DiagnosisResult::default();
        self.flagged.clear();
    }

    fn input_data(&mut self, answers: &Answers) -> Result<(), DiagnosticError> {
        for fact in facts_from_answers(&QUIZ, Condition::Screening, answers)? {
            self.memory.declare(fact)?;
        }
        self.memory.assert_stage(TRIAGE_STAGE);
        Ok(())
    }

    fn run(&mut self) -> Result<StageTrace, DiagnosticError> {
        match self.memory.stage() {
            None => return Err(DiagnosticError::NotPrimed(Condition::Screening)),
            Some(DONE) => return Ok(StageTrace::default()),
            Some(_) => {}
        }

        for (key, condition) in TRIAGE_FLAGS {
            if self.memory.code(*key)? == 1 {
                self.result.diagnosis.push(condition.key().to_string());
                self.flagged.push(*condition);
            }
        }
        self.memory.assert_stage(DONE);
        info!(flagged = self.flagged.len(), "screening triage completed");
        Ok(StageTrace {
            fired: vec![TRIAGE_STAGE],
        })
    }

    fn result(&self) -> &DiagnosisResult {
        &self.result
    }
}
