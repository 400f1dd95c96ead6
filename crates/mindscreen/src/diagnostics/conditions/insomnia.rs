use crate::diagnostics::assessment::{evaluate_risk, ConditionProfile};
use crate::diagnostics::bayes::{BayesianNetwork, ModelValidationError, TabularCpd};
use crate::diagnostics::domain::{Condition, DiagnosticError, Question, Quiz};
use crate::diagnostics::evidence::{EvidenceMapper, EvidenceRule};
use crate::diagnostics::facts::WorkingMemory;
use crate::diagnostics::sequencer::{Stage, StageChain, StageContext};
use crate::diagnostics::severity::{BandGuidance, BandText, IsiInterpretation};

use super::{CONSULT_PROFESSIONAL, MEDICAL_CONDITION_OPTIONS, MEDICAL_CONDITION_REFERRAL};

/// ISI total above which a professional referral replaces general advice.
const ISI_REFERRAL_THRESHOLD: u8 = 14;

pub static QUIZ: Quiz = Quiz {
    questions: &[
        Question::single(
            "difficulty_sleep",
            "¿Cuál de los siguientes problemas para dormir experimenta con mayor frecuencia?",
            &[
                "Dificultad para iniciar el sueño",
                "Dificultad para mantener el sueño",
                "Despertares nocturnos frecuentes",
                "Despertares tempranos",
                "Sueño no reparador",
            ],
        ),
        Question::single(
            "daytime_consequence",
            "¿Cuál de las siguientes consecuencias diurnas experimenta con mayor frecuencia?",
            &[
                "Fatiga",
                "Somnolencia diurna",
                "Irritabilidad",
                "Dificultad para concentrarse",
                "Disminución de la memoria",
                "Disminución del rendimiento laboral y académico",
                "Problemas de conducta",
                "Baja motivación y energía",
                "Tendencia a errores y accidentes",
                "Preocupación por el sueño",
            ],
        ),
        Question::scale(
            "isi_score",
            "Puntúe de 0 (nada) a 4 (muy grave) cada uno de los siguientes aspectos de las últimas dos semanas.",
            &[
                "Dificultad para quedarse dormido",
                "Dificultad para permanecer dormido",
                "Problemas por despertarse demasiado temprano",
                "Insatisfacción con el patrón de sueño actual",
                "Interferencia del problema de sueño con su funcionamiento diario",
                "Grado en que otros notan el deterioro de su calidad de vida",
                "Preocupación por su problema de sueño",
            ],
        ),
        Question::single(
            "medical_cause",
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
            &["Estrés", "Ansiedad", "Depresión", "Ninguna de las anteriores"],
        ),
        Question::single(
            "lifestyle_factor",
            "¿Tiene alguno de los siguientes hábitos?",
            &[
                "Consumo de cafeína, nicotina o alcohol antes de dormir",
                "Alimentación inadecuada (comidas pesadas antes de dormir)",
                "Falta de ejercicio",
                "Uso de dispositivos electrónicos antes de dormir",
                "Ninguno de los anteriores",
            ],
        ),
        Question::single(
            "sleep_environment",
            "¿Su entorno de sueño es adecuado para dormir?",
            &[
                "Sí",
                "No (p.ej., ruido, luz, temperatura inapropiada, colchón incómodo)",
            ],
        ),
    ],
};

const EVIDENCE: &[EvidenceRule] = &[
    EvidenceRule::new("SleepEnvironment", "sleep_environment", &[2], &[1]),
    EvidenceRule::new("CaffeineUse", "lifestyle_factor", &[1], &[2, 3, 4, 5]),
    EvidenceRule::new("MedicationUse", "medication_use", &[1, 2, 3, 4], &[5]),
    EvidenceRule::new("PsychologicalIssues", "psychological_cause", &[1, 2, 3], &[4]),
];

const STAGES: &[Stage] = &[
    Stage {
        token: "difficulty_sleep",
        requires: &["difficulty_sleep"],
        handler: difficulty_sleep,
    },
    Stage {
        token: "daytime_consequence",
        requires: &["daytime_consequence"],
        handler: daytime_consequence,
    },
    Stage {
        token: "isi_score",
        requires: &["isi_score"],
        handler: isi_score,
    },
    Stage {
        token: "medical_cause",
        requires: &["medical_cause"],
        handler: medical_cause,
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
        token: "sleep_environment",
        requires: &["sleep_environment"],
        handler: sleep_environment,
    },
    Stage {
        token: "evaluate_risk",
        requires: &[
            "sleep_environment",
            "lifestyle_factor",
            "medication_use",
            "psychological_cause",
        ],
        handler: evaluate_risk,
    },
    Stage {
        token: "final_recommendations",
        requires: &["isi_score"],
        handler: final_recommendations,
    },
];

pub static PROFILE: ConditionProfile = ConditionProfile {
    condition: Condition::Insomnia,
    subject: "insomnio",
    quiz: &QUIZ,
    chain: StageChain::new(STAGES),
    evidence: EvidenceMapper::new(EVIDENCE),
    outcome: "Insomnia",
    network,
    bands: BandGuidance {
        low: BandText {
            diagnosis: "Su probabilidad de insomnio está en un rango bajo.",
            recommendations: &[
                "Considere mejorar su higiene del sueño, como mantener un horario regular de sueño y evitar la cafeína y la nicotina antes de acostarse.",
            ],
        },
        moderate: BandText {
            diagnosis: "Su probabilidad de insomnio es moderada.",
            recommendations: &[
                "Considere mejorar su higiene del sueño, como mantener un horario regular de sueño y evitar la cafeína y la nicotina antes de acostarse.",
                "Además de mejorar su higiene del sueño, considere practicar técnicas de relajación antes de acostarse, como meditación o respiración profunda.",
            ],
        },
        moderately_high: BandText {
            diagnosis: "Su probabilidad de insomnio es moderadamente alta.",
            recommendations: &[
                "Junto con mejorar su higiene del sueño y practicar técnicas de relajación, considere buscar ayuda profesional para evaluar y abordar cualquier condición subyacente que pueda estar contribuyendo a su insomnio.",
                "Lleve un diario de sueño durante dos semanas para compartirlo con un profesional.",
                "Evite las siestas largas durante el día.",
            ],
        },
        high: BandText {
            diagnosis: "Su probabilidad de insomnio es alta.",
            recommendations: &[
                "Es altamente recomendable que busque ayuda profesional de inmediato con un médico o especialista en trastornos del sueño para una evaluación y tratamiento adecuados.",
                "Pregunte a su médico por la terapia cognitivo-conductual para el insomnio (TCC-I).",
                "No se automedique con somníferos ni aumente la dosis sin supervisión médica.",
                "Evite conducir o manejar maquinaria si siente somnolencia durante el día.",
            ],
        },
    },
};

fn network() -> Result<BayesianNetwork, ModelValidationError> {
    BayesianNetwork::builder()
        .cpd(TabularCpd::root("SleepEnvironment", &[0.8, 0.2]))
        .cpd(TabularCpd::root("CaffeineUse", &[0.7, 0.3]))
        .cpd(TabularCpd::root("MedicationUse", &[0.9, 0.1]))
        .cpd(TabularCpd::root("PsychologicalIssues", &[0.6, 0.4]))
        .cpd(TabularCpd::conditional(
            "Insomnia",
            &[
                &[
                    0.9, 0.7, 0.8, 0.6, 0.75, 0.55, 0.65, 0.45, 0.7, 0.5, 0.6, 0.4, 0.5, 0.3, 0.4,
                    0.2,
                ],
                &[
                    0.1, 0.3, 0.2, 0.4, 0.25, 0.45, 0.35, 0.55, 0.3, 0.5, 0.4, 0.6, 0.5, 0.7, 0.6,
                    0.8,
                ],
            ],
            &[
                "SleepEnvironment",
                "CaffeineUse",
                "MedicationUse",
                "PsychologicalIssues",
            ],
        ))
        .build()
}

fn difficulty_sleep(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    let problem = context.describe("difficulty_sleep", memory.codes("difficulty_sleep")?);
    context.diagnose(format!("Problema para dormir: {problem}"));
    Ok(())
}

fn daytime_consequence(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    let consequence =
        context.describe("daytime_consequence", memory.codes("daytime_consequence")?);
    context.diagnose(format!("Consecuencia diurna más frecuente: {consequence}"));
    Ok(())
}

fn isi_score(memory: &WorkingMemory, context: &mut StageContext<'_>) -> Result<(), DiagnosticError> {
    let score = memory.score("isi_score")?;
    let interpretation = IsiInterpretation::from_score(score);
    context.diagnose(format!("Puntuación ISI: {score}"));
    context.recommend(interpretation.recommendation());
    context.result.isi = Some(interpretation);
    Ok(())
}

fn medical_cause(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    let code = memory.code("medical_cause")?;
    if code != 5 {
        let cause = context.describe("medical_cause", &[code]);
        context.diagnose(format!("Causa médica potencial: {cause}"));
        context.recommend(MEDICAL_CONDITION_REFERRAL);
    }
    Ok(())
}

fn medication_use(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    if memory.code("medication_use")? != 5 {
        context.recommend(
            "Revise los medicamentos con su médico para ver si pueden estar afectando su sueño.",
        );
    }
    Ok(())
}

fn psychological_cause(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    let advice = match memory.code("psychological_cause")? {
        1 => "Considere técnicas de manejo del estrés como mindfulness y respiración profunda.",
        2 => "La terapia cognitivo-conductual puede ser útil para manejar la ansiedad.",
        3 => "Considere hablar con un terapeuta sobre opciones de tratamiento para la depresión.",
        _ => return Ok(()),
    };
    context.recommend(advice);
    Ok(())
}

fn lifestyle_factor(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    let advice = match memory.code("lifestyle_factor")? {
        1 => "Evite consumir cafeína, nicotina o alcohol antes de dormir.",
        2 => "Intente evitar comidas pesadas antes de acostarse.",
        3 => "Incorpore ejercicio regular en su rutina diaria.",
        4 => "Evite el uso de dispositivos electrónicos al menos una hora antes de dormir.",
        _ => return Ok(()),
    };
    context.recommend(advice);
    Ok(())
}

fn sleep_environment(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    if memory.code("sleep_environment")? != 1 {
        context.recommend(
            "Asegúrese de que su entorno de sueño sea cómodo y propicio para dormir (sin ruido, luz y temperatura adecuadas).",
        );
    }
    Ok(())
}

fn final_recommendations(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    if memory.score("isi_score")? > ISI_REFERRAL_THRESHOLD {
        context.recommend(CONSULT_PROFESSIONAL);
        return Ok(());
    }
    for practice in [
        "Puede considerar implementar las siguientes prácticas generales:",
        "- Mantener una rutina regular para dormir.",
        "- Evitar el uso de dispositivos electrónicos antes de dormir.",
        "- Crear un ambiente de sueño adecuado.",
        "- Practicar técnicas de relajación antes de acostarse.",
    ] {
        context.recommend(practice);
    }
    Ok(())
}
