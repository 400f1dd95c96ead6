pub mod anxiety;
pub mod depression;
pub mod insomnia;
pub mod screening;
pub mod stress;

use super::domain::DiagnosticError;
use super::facts::WorkingMemory;
use super::sequencer::StageContext;

pub(crate) const YES_NO: &[&str] = &["Sí", "No"];

pub(crate) const MEDICAL_CONDITION_OPTIONS: &[&str] = &[
    "Enfermedades neurológicas",
    "Enfermedades cardiorespiratorias",
    "Enfermedades gastrointestinales",
    "Enfermedades endocrinas",
    "Ninguna de las anteriores",
];

pub(crate) const CONSULT_PROFESSIONAL: &str =
    "Recomendamos que consulte a un profesional de la salud para un diagnóstico y tratamiento más detallado.";

pub(crate) const MEDICAL_CONDITION_REFERRAL: &str =
    "Consulte con un profesional de la salud para tratar la condición médica subyacente.";

/// Appends `advice` when the yes/no fact `key` was answered "Sí".
pub(crate) fn recommend_on_yes(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
    key: &'static str,
    advice: &'static str,
) -> Result<(), DiagnosticError> {
    if memory.code(key)? == 1 {
        context.recommend(advice);
    }
    Ok(())
}
