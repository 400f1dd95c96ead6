use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::diagnostics::domain::{AnswerValue, Answers};
use crate::diagnostics::evidence::EvidencePolicy;
use crate::diagnostics::registry::{DiagnosticService, ModelCatalog};

pub(super) fn catalog() -> Arc<ModelCatalog> {
    Arc::new(ModelCatalog::load().expect("built-in models validate"))
}

pub(super) fn service() -> DiagnosticService {
    DiagnosticService::new(catalog(), EvidencePolicy::Strict)
}

pub(super) fn answers(pairs: &[(&str, &str)]) -> Answers {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), AnswerValue::Text(value.to_string())))
        .collect()
}

pub(super) fn anxiety_answers(
    sleep_problems: &str,
    lifestyle_factor: &str,
    medication_use: &str,
    psychological_cause: &str,
) -> Answers {
    answers(&[
        ("anxiety_symptoms", "1,6"),
        ("daytime_impact", "2"),
        ("physiological_cause", "5"),
        ("medication_use", medication_use),
        ("psychological_cause", psychological_cause),
        ("lifestyle_factor", lifestyle_factor),
        ("sleep_problems", sleep_problems),
    ])
}

pub(super) fn insomnia_answers(isi_score: &str, positive_evidence: bool) -> Answers {
    let (environment, lifestyle, medication, psychological) = if positive_evidence {
        ("2", "1", "1", "1")
    } else {
        ("1", "5", "5", "4")
    };
    answers(&[
        ("difficulty_sleep", "2"),
        ("daytime_consequence", "1"),
        ("isi_score", isi_score),
        ("medical_cause", "5"),
        ("medication_use", medication),
        ("psychological_cause", psychological),
        ("lifestyle_factor", lifestyle),
        ("sleep_environment", environment),
    ])
}

pub(super) fn yes_no_answers(keys: &[&str], answer: &str) -> Answers {
    keys.iter()
        .map(|key| (key.to_string(), AnswerValue::Text(answer.to_string())))
        .collect()
}

pub(super) const DEPRESSION_KEYS: &[&str] = &[
    "factores_ambientales",
    "habitos",
    "causas_psicologicas",
    "cambios_hormonales",
    "medicacion",
    "consecuencias",
    "causas_fisiologicas",
];

pub(super) const STRESS_KEYS: &[&str] = &[
    "cuestiones_cronicas",
    "situaciones_cotidianas",
    "sucesos_vitales",
    "susceptibilidad_interna",
    "valoracion_cognitiva",
    "relaciones_interpersonales",
    "presion_laboral",
    "falta_apoyo_social",
];

/// Screening payload; each flag is "1" (yes) or "2" (no).
pub(super) fn screening_answers(anxiety: &str, sleep: &str, irritability: &str, mood: &str) -> Answers {
    answers(&[
        ("age", "3"),
        ("gender", "4"),
        ("medical_history", "2"),
        ("medication", "2"),
        ("sleep_issues", sleep),
        ("irritability", irritability),
        ("mood", mood),
        ("family_history", "3"),
        ("appetite_weight_changes", "2"),
        ("concentration_memory_problems", "1"),
        ("anxiety", anxiety),
    ])
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
