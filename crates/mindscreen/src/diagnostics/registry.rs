use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::assessment::{Assessment, ConditionProfile, DiagnosticModule};
use super::batch::AnswerSheet;
use super::bayes::{ModelValidationError, RiskModel};
use super::conditions::{anxiety, depression, insomnia, screening, stress};
use super::domain::{Answers, Condition, DiagnosisResult, DiagnosticError, Quiz};
use super::evidence::EvidencePolicy;
use super::sequencer::StageTrace;
use super::severity::{IsiInterpretation, RiskAssessment};

impl Condition {
    pub fn quiz(self) -> &'static Quiz {
        profile(self).map_or(&screening::QUIZ, |profile| profile.quiz)
    }
}

/// Static profile behind a condition-specific module.
pub fn profile(condition: Condition) -> Option<&'static ConditionProfile> {
    match condition {
        Condition::Screening => None,
        Condition::Anxiety => Some(&anxiety::PROFILE),
        Condition::Insomnia => Some(&insomnia::PROFILE),
        Condition::Depression => Some(&depression::PROFILE),
        Condition::Stress => Some(&stress::PROFILE),
    }
}

pub fn get_quiz(key: &str) -> Result<&'static Quiz, DiagnosticError> {
    Ok(key.parse::<Condition>()?.quiz())
}

/// Validated risk models, built once and shared read-only by every run.
#[derive(Debug)]
pub struct ModelCatalog {
    models: BTreeMap<Condition, Arc<RiskModel>>,
}

impl ModelCatalog {
    pub fn load() -> Result<Self, ModelValidationError> {
        let mut models = BTreeMap::new();
        for condition in Condition::specific() {
            if let Some(profile) = profile(condition) {
                let model = profile.risk_model()?;
                info!(
                    %condition,
                    outcome = model.outcome(),
                    nodes = model.network().len(),
                    "risk model validated"
                );
                models.insert(condition, Arc::new(model));
            }
        }
        Ok(Self { models })
    }

    pub fn model(&self, condition: Condition) -> Option<Arc<RiskModel>> {
        self.models.get(&condition).cloned()
    }

    /// Fresh module instance with its own working memory.
    pub fn assessment(
        &self,
        condition: Condition,
        policy: EvidencePolicy,
    ) -> Result<DiagnosticModule, DiagnosticError> {
        match (profile(condition), self.model(condition)) {
            (Some(profile), Some(model)) => Ok(DiagnosticModule::new(profile, model, policy)),
            _ => Err(DiagnosticError::NotRedirectable(condition)),
        }
    }
}

/// Any module the registry can hand out.
#[derive(Debug)]
pub enum ConditionModule {
    Screening(screening::ScreeningRouter),
    Assessment(DiagnosticModule),
}

impl ConditionModule {
    pub fn new(
        catalog: &Arc<ModelCatalog>,
        condition: Condition,
        policy: EvidencePolicy,
    ) -> Result<Self, DiagnosticError> {
        match condition {
            Condition::Screening => Ok(Self::Screening(screening::ScreeningRouter::new(
                Arc::clone(catalog),
                policy,
            ))),
            other => catalog.assessment(other, policy).map(Self::Assessment),
        }
    }

    /// Diagnosis for the screening router, recommendations otherwise.
    pub fn analysis(&self) -> &[String] {
        match self {
            Self::Screening(router) => router.diagnosis(),
            Self::Assessment(module) => module.recommendations(),
        }
    }
}

impl Assessment for ConditionModule {
    fn condition(&self) -> Condition {
        match self {
            Self::Screening(router) => router.condition(),
            Self::Assessment(module) => module.condition(),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Screening(router) => router.reset(),
            Self::Assessment(module) => module.reset(),
        }
    }

    fn input_data(&mut self, answers: &Answers) -> Result<(), DiagnosticError> {
        match self {
            Self::Screening(router) => router.input_data(answers),
            Self::Assessment(module) => module.input_data(answers),
        }
    }

    fn run(&mut self) -> Result<StageTrace, DiagnosticError> {
        match self {
            Self::Screening(router) => router.run(),
            Self::Assessment(module) => module.run(),
        }
    }

    fn result(&self) -> &DiagnosisResult {
        match self {
            Self::Screening(router) => router.result(),
            Self::Assessment(module) => module.result(),
        }
    }
}

/// Full outcome of one analysis, for clients that want more than the
/// recommendation list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub condition: Condition,
    pub diagnosis: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isi: Option<IsiInterpretation>,
    pub stages: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingOutcome {
    pub flagged: Vec<Condition>,
    pub visited: Vec<Condition>,
    pub diagnosis: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub respondent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AnalysisReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Entry point used by the HTTP layer and the CLI. Each call builds its own
/// module instance; only the validated models are shared.
#[derive(Debug, Clone)]
pub struct DiagnosticService {
    catalog: Arc<ModelCatalog>,
    policy: EvidencePolicy,
}

impl DiagnosticService {
    pub fn new(catalog: Arc<ModelCatalog>, policy: EvidencePolicy) -> Self {
        Self { catalog, policy }
    }

    pub fn load(policy: EvidencePolicy) -> Result<Self, ModelValidationError> {
        Ok(Self::new(Arc::new(ModelCatalog::load()?), policy))
    }

    pub fn policy(&self) -> EvidencePolicy {
        self.policy
    }

    pub fn catalog(&self) -> &Arc<ModelCatalog> {
        &self.catalog
    }

    pub fn quiz(&self, key: &str) -> Result<&'static Quiz, DiagnosticError> {
        get_quiz(key)
    }

    /// Diagnosis lines for the screening router, recommendations for every
    /// other condition.
    pub fn analyze(&self, key: &str, answers: &Answers) -> Result<Vec<String>, DiagnosticError> {
        let (module, _) = self.execute(key.parse()?, answers)?;
        Ok(module.analysis().to_vec())
    }

    pub fn report(&self, key: &str, answers: &Answers) -> Result<AnalysisReport, DiagnosticError> {
        self.report_for(key.parse()?, answers)
    }

    pub fn report_for(
        &self,
        condition: Condition,
        answers: &Answers,
    ) -> Result<AnalysisReport, DiagnosticError> {
        let (module, trace) = self.execute(condition, answers)?;
        let result = module.result().clone();
        Ok(AnalysisReport {
            condition,
            diagnosis: result.diagnosis,
            recommendations: result.recommendations,
            risk: result.risk,
            isi: result.isi,
            stages: trace.fired,
        })
    }

    /// Screening triage followed by redirects into every flagged condition
    /// that has follow-up answers.
    pub fn route(
        &self,
        answers: &Answers,
        follow_ups: &BTreeMap<Condition, Answers>,
    ) -> Result<RoutingOutcome, DiagnosticError> {
        let mut router = screening::ScreeningRouter::new(Arc::clone(&self.catalog), self.policy);
        router.reset();
        router.input_data(answers)?;
        router.run()?;
        let visited = router.redirect_flagged(follow_ups)?;
        Ok(RoutingOutcome {
            flagged: router.flagged().to_vec(),
            visited,
            diagnosis: router.diagnosis().to_vec(),
            recommendations: router.recommendations().to_vec(),
        })
    }

    /// Analyzes every sheet independently; a bad sheet does not stop the batch.
    pub fn analyze_batch(&self, condition: Condition, sheets: &[AnswerSheet]) -> Vec<BatchOutcome> {
        sheets
            .iter()
            .map(|sheet| match self.report_for(condition, &sheet.answers) {
                Ok(report) => BatchOutcome {
                    respondent: sheet.respondent.clone(),
                    report: Some(report),
                    error: None,
                },
                Err(error) => {
                    warn!(respondent = %sheet.respondent, %error, "answer sheet rejected");
                    BatchOutcome {
                        respondent: sheet.respondent.clone(),
                        report: None,
                        error: Some(error.to_string()),
                    }
                }
            })
            .collect()
    }

    fn execute(
        &self,
        condition: Condition,
        answers: &Answers,
    ) -> Result<(ConditionModule, StageTrace), DiagnosticError> {
        let mut module = ConditionModule::new(&self.catalog, condition, self.policy)?;
        module.reset();
        module.input_data(answers)?;
        let trace = module.run()?;
        Ok((module, trace))
    }
}
