//! Mental-health screening diagnostics.
//!
//! Each condition module collects questionnaire answers as facts, fires a
//! fixed chain of rule stages over them, and finishes with an exact query
//! against a small Bayesian network. A general screening router flags
//! conditions and can redirect into the condition modules.

pub mod assessment;
pub mod batch;
pub mod bayes;
pub mod conditions;
pub mod domain;
pub mod evidence;
pub mod facts;
pub mod registry;
pub mod router;
pub mod sequencer;
pub mod severity;

#[cfg(test)]
mod tests;

pub use assessment::{Assessment, ConditionProfile, DiagnosticModule};
pub use batch::{AnswerSheet, AnswerSheetImporter, BatchImportError};
pub use bayes::{
    BayesianNetwork, Evidence, InferenceError, ModelValidationError, RiskModel, TabularCpd,
};
pub use conditions::screening::ScreeningRouter;
pub use domain::{
    AnswerMode, AnswerValue, Answers, Condition, DiagnosisResult, DiagnosticError, Question,
    Quiz,
};
pub use evidence::{EvidenceMapper, EvidencePolicy, EvidenceRule};
pub use facts::{Fact, FactValue, WorkingMemory};
pub use registry::{
    get_quiz, AnalysisReport, BatchOutcome, ConditionModule, DiagnosticService, ModelCatalog,
    RoutingOutcome,
};
pub use router::{diagnostics_router, status_for, AnalysisRequest, RoutingRequest};
pub use sequencer::{Stage, StageChain, StageContext, StageTrace};
pub use severity::{IsiInterpretation, RiskAssessment, SeverityBand};
