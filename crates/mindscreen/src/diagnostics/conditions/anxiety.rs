use crate::diagnostics::assessment::{evaluate_risk, ConditionProfile};
use crate::diagnostics::bayes::{BayesianNetwork, ModelValidationError, TabularCpd};
use crate::diagnostics::domain::{Condition, DiagnosticError, Question, Quiz};
use crate::diagnostics::evidence::{EvidenceMapper, EvidenceRule};
use crate::diagnostics::facts::WorkingMemory;
use crate::diagnostics::sequencer::{Stage, StageChain, StageContext};
use crate::diagnostics::severity::{BandGuidance, BandText};

use super::{
    CONSULT_PROFESSIONAL, MEDICAL_CONDITION_OPTIONS, MEDICAL_CONDITION_REFERRAL, YES_NO,
};

pub static QUIZ: Quiz = Quiz {
    questions: &[
        Question::multi(
            "anxiety_symptoms",
            "¿Cuáles de los siguientes síntomas de ansiedad experimenta con frecuencia?",
            &[
                "Preocupación excesiva",
                "Inquietud",
                "Fatiga",
                "Dificultad para concentrarse",
                "Irritabilidad",
                "Tensión muscular",
                "Problemas para dormir",
            ],
        ),
        Question::single(
            "daytime_impact",
            "¿Cuánto afecta su ansiedad a su vida diaria?",
            &["Nada", "Un poco", "Moderadamente", "Mucho", "Extremadamente"],
        ),
        Question::single(
            "physiological_cause",
            "¿Ha sido diagnosticado con alguna de las siguientes condiciones médicas?",
            MEDICAL_CONDITION_OPTIONS,
        ),
        Question::single(
            "medication_use",
            "¿Está tomando alguno de los siguientes medicamentos?",
            &[
                "Antidepresivos",
                "Estimulantes",
                "Corticosteroides",
                "Antihipertensivos",
                "Ninguno de los anteriores",
            ],
        ),
        Question::single(
            "psychological_cause",
            "¿Está experimentando alguna de las siguientes condiciones psicológicas?",
            &["Estrés", "Depresión", "Ninguna de las anteriores"],
        ),
        Question::single(
            "lifestyle_factor",
            "¿Tiene alguno de los siguientes hábitos?",
            &[
                "Consumo de cafeína o alcohol en exceso",
                "Alimentación inadecuada",
                "Falta de ejercicio",
                "Uso excesivo de dispositivos electrónicos",
                "Ninguno de los anteriores",
            ],
        ),
        Question::single(
            "sleep_problems",
            "¿Tiene problemas para dormir debido a su ansiedad?",
            YES_NO,
        ),
    ],
};

const EVIDENCE: &[EvidenceRule] = &[
    EvidenceRule::new("SleepProblems", "sleep_problems", &[1], &[2]),
    EvidenceRule::new("CaffeineUse", "lifestyle_factor", &[1, 2], &[3, 4, 5]),
    EvidenceRule::new("MedicationUse", "medication_use", &[1, 2, 3, 4], &[5]),
    EvidenceRule::new("PsychologicalIssues", "psychological_cause", &[1, 2], &[3]),
];

const STAGES: &[Stage] = &[
    Stage {
        token: "anxiety_symptoms",
        requires: &["anxiety_symptoms"],
        handler: anxiety_symptoms,
    },
    Stage {
        token: "daytime_impact",
        requires: &["daytime_impact"],
        handler: daytime_impact,
    },
    Stage {
        token: "physiological_cause",
        requires: &["physiological_cause"],
        handler: physiological_cause,
    },
    Stage {
        token: "medication_use",
        requires: &["medication_use"],
        handler: medication_use,
    },
    Stage {
        token: "psychological_cause",
        requires: &["psychological_cause"],
        handler: psychological_cause,
    },
    Stage {
        token: "lifestyle_factor",
        requires: &["lifestyle_factor"],
        handler: lifestyle_factor,
    },
    Stage {
        token: "sleep_problems",
        requires: &["sleep_problems"],
        handler: sleep_problems,
    },
    Stage {
        token: "evaluate_risk",
        requires: &[
            "sleep_problems",
            "lifestyle_factor",
            "medication_use",
            "psychological_cause",
        ],
        handler: evaluate_risk,
    },
];

pub static PROFILE: ConditionProfile = ConditionProfile {
    condition: Condition::Anxiety,
    subject: "ansiedad",
    quiz: &QUIZ,
    chain: StageChain::new(STAGES),
    evidence: EvidenceMapper::new(EVIDENCE),
    outcome: "Anxiety",
    network,
    bands: BandGuidance {
        low: BandText {
            diagnosis: "Su probabilidad de ansiedad está en un rango bajo.",
            recommendations: &[
                "Pruebe técnicas de relajación como la respiración profunda o el mindfulness.",
            ],
        },
        moderate: BandText {
            diagnosis: "Su probabilidad de ansiedad es moderada.",
            recommendations: &[
                "Considere hablar con un terapeuta sobre sus preocupaciones y busque apoyo en amigos y familiares.",
                "Mantenga una rutina de ejercicio y descanso que le ayude a regular la tensión.",
            ],
        },
        moderately_high: BandText {
            diagnosis: "Su probabilidad de ansiedad es moderadamente alta.",
            recommendations: &[
                "Es recomendable buscar ayuda profesional para obtener un diagnóstico preciso y considerar opciones de tratamiento.",
                "Lleve un registro de las situaciones que desencadenan su ansiedad para compartirlo con un profesional.",
                "Reduzca el consumo de cafeína, alcohol y otras sustancias estimulantes.",
            ],
        },
        high: BandText {
            diagnosis: "Su probabilidad de ansiedad es alta.",
            recommendations: &[
                "Es crucial buscar ayuda profesional de inmediato para un tratamiento adecuado y el apoyo necesario.",
                "Evite el consumo de alcohol y drogas recreativas, ya que pueden empeorar los síntomas de la ansiedad.",
                "Pruebe técnicas de manejo del estrés como el ejercicio regular, la meditación o el yoga.",
                "Hable con su médico sobre la posibilidad de terapia cognitivo-conductual (TCC) o medicación para la ansiedad.",
                "Considere la posibilidad de unirse a un grupo de apoyo o buscar terapia individual para obtener apoyo adicional.",
                "Priorice el autocuidado y establezca límites saludables en su vida diaria para reducir el estrés.",
            ],
        },
    },
};

fn network() -> Result<BayesianNetwork, ModelValidationError> {
    BayesianNetwork::builder()
        .cpd(TabularCpd::root("SleepProblems", &[0.7, 0.3]))
        .cpd(TabularCpd::root("CaffeineUse", &[0.6, 0.4]))
        .cpd(TabularCpd::root("MedicationUse", &[0.8, 0.2]))
        .cpd(TabularCpd::root("PsychologicalIssues", &[0.5, 0.5]))
        .cpd(TabularCpd::conditional(
            "Anxiety",
            &[
                &[
                    0.9, 0.8, 0.7, 0.6, 0.8, 0.7, 0.6, 0.5, 0.75, 0.65, 0.55, 0.45, 0.7, 0.6, 0.5,
                    0.4,
                ],
                &[
                    0.1, 0.2, 0.3, 0.4, 0.2, 0.3, 0.4, 0.5, 0.25, 0.35, 0.45, 0.55, 0.3, 0.4, 0.5,
                    0.6,
                ],
            ],
            &[
                "SleepProblems",
                "CaffeineUse",
                "MedicationUse",
                "PsychologicalIssues",
            ],
        ))
        .build()
}

fn anxiety_symptoms(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    let symptoms = context.describe("anxiety_symptoms", memory.codes("anxiety_symptoms")?);
    context.diagnose(format!("Síntomas de ansiedad: {symptoms}"));
    Ok(())
}

fn daytime_impact(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    let code = memory.code("daytime_impact")?;
    let impact = context.describe("daytime_impact", &[code]);
    context.diagnose(format!("Impacto en la vida diaria: {impact}"));
    if code >= 4 {
        context.recommend(CONSULT_PROFESSIONAL);
    } else {
        for practice in [
            "Puede considerar implementar las siguientes prácticas generales:",
            "- Mantener una rutina diaria regular.",
            "- Practicar técnicas de relajación.",
            "- Evitar el consumo excesivo de cafeína y alcohol.",
            "- Crear un ambiente de sueño adecuado.",
        ] {
            context.recommend(practice);
        }
    }
    Ok(())
}

fn physiological_cause(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    let code = memory.code("physiological_cause")?;
    if code != 5 {
        let cause = context.describe("physiological_cause", &[code]);
        context.diagnose(format!("Causa fisiológica potencial: {cause}"));
        context.recommend(MEDICAL_CONDITION_REFERRAL);
    }
    Ok(())
}

fn medication_use(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    let code = memory.code("medication_use")?;
    if code != 5 {
        let medication = context.describe("medication_use", &[code]);
        context.diagnose(format!("Uso de medicación potencialmente influyente: {medication}"));
        context.recommend(
            "Revise los medicamentos con su médico para ver si pueden estar afectando su ansiedad.",
        );
    }
    Ok(())
}

fn psychological_cause(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    let code = memory.code("psychological_cause")?;
    let advice = match code {
        1 => "Considere técnicas de manejo del estrés como mindfulness y respiración profunda.",
        2 => "Considere hablar con un terapeuta sobre opciones de tratamiento para la depresión.",
        _ => return Ok(()),
    };
    let condition = context.describe("psychological_cause", &[code]);
    context.diagnose(format!("Condición psicológica asociada: {condition}"));
    context.recommend(advice);
    Ok(())
}

fn lifestyle_factor(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    let code = memory.code("lifestyle_factor")?;
    let advice = match code {
        1 => "Reduzca el consumo de cafeína y alcohol.",
        2 => "Mejore su alimentación.",
        3 => "Incorpore ejercicio regular en su rutina diaria.",
        4 => "Reduzca el uso de dispositivos electrónicos.",
        _ => return Ok(()),
    };
    let factor = context.describe("lifestyle_factor", &[code]);
    context.diagnose(format!("Factor de estilo de vida potencialmente influyente: {factor}"));
    context.recommend(advice);
    Ok(())
}

fn sleep_problems(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    let code = memory.code("sleep_problems")?;
    if code != 2 {
        let answer = context.describe("sleep_problems", &[code]);
        context.diagnose(format!("Problemas de sueño: {answer}"));
        context.recommend("Intente mejorar su higiene del sueño.");
    }
    Ok(())
}
