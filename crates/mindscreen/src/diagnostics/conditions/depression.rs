use crate::diagnostics::assessment::{evaluate_risk, ConditionProfile};
use crate::diagnostics::bayes::{BayesianNetwork, ModelValidationError, TabularCpd};
use crate::diagnostics::domain::{Condition, DiagnosticError, Question, Quiz};
use crate::diagnostics::evidence::{EvidenceMapper, EvidenceRule};
use crate::diagnostics::facts::WorkingMemory;
use crate::diagnostics::sequencer::{Stage, StageChain, StageContext};
use crate::diagnostics::severity::{BandGuidance, BandText};

use super::{recommend_on_yes, YES_NO};

pub static QUIZ: Quiz = Quiz {
    questions: &[
        Question::single(
            "factores_ambientales",
            "¿Tiene factores ambientales que puedan causar estrés?",
            YES_NO,
        ),
        Question::single(
            "habitos",
            "¿Tiene hábitos que puedan afectar su salud mental?",
            YES_NO,
        ),
        Question::single(
            "causas_psicologicas",
            "¿Tiene causas psicológicas que puedan causar depresión?",
            YES_NO,
        ),
        Question::single(
            "cambios_hormonales",
            "¿Ha tenido cambios hormonales recientes?",
            YES_NO,
        ),
        Question::single(
            "medicacion",
            "¿Está tomando medicación que pueda afectar su estado de ánimo?",
            YES_NO,
        ),
        Question::single(
            "consecuencias",
            "¿Está experimentando consecuencias significativas en su vida?",
            YES_NO,
        ),
        Question::single(
            "causas_fisiologicas",
            "¿Tiene causas fisiológicas que puedan causar depresión?",
            YES_NO,
        ),
    ],
};

const EVIDENCE: &[EvidenceRule] = &[
    EvidenceRule::new("FactoresAmbientales", "factores_ambientales", &[1], &[2]),
    EvidenceRule::new("Habitos", "habitos", &[1], &[2]),
    EvidenceRule::new("CausasPsicologicas", "causas_psicologicas", &[1], &[2]),
    EvidenceRule::new("CambiosHormonales", "cambios_hormonales", &[1], &[2]),
    EvidenceRule::new("Medicación", "medicacion", &[1], &[2]),
    EvidenceRule::new("Consecuencias", "consecuencias", &[1], &[2]),
    EvidenceRule::new("CausasFisiologicas", "causas_fisiologicas", &[1], &[2]),
];

const STAGES: &[Stage] = &[
    Stage {
        token: "factores_ambientales",
        requires: &["factores_ambientales"],
        handler: environmental_factors,
    },
    Stage {
        token: "habitos",
        requires: &["habitos"],
        handler: habits,
    },
    Stage {
        token: "causas_psicologicas",
        requires: &["causas_psicologicas"],
        handler: psychological_causes,
    },
    Stage {
        token: "cambios_hormonales",
        requires: &["cambios_hormonales"],
        handler: hormonal_changes,
    },
    Stage {
        token: "medicacion",
        requires: &["medicacion"],
        handler: medication,
    },
    Stage {
        token: "consecuencias",
        requires: &["consecuencias"],
        handler: consequences,
    },
    Stage {
        token: "causas_fisiologicas",
        requires: &["causas_fisiologicas"],
        handler: physiological_causes,
    },
    Stage {
        token: "evaluate_risk",
        requires: &[
            "factores_ambientales",
            "habitos",
            "causas_psicologicas",
            "cambios_hormonales",
            "medicacion",
            "consecuencias",
            "causas_fisiologicas",
        ],
        handler: evaluate_risk,
    },
];

pub static PROFILE: ConditionProfile = ConditionProfile {
    condition: Condition::Depression,
    subject: "depresión",
    quiz: &QUIZ,
    chain: StageChain::new(STAGES),
    evidence: EvidenceMapper::new(EVIDENCE),
    outcome: "Depresion",
    network,
    bands: BandGuidance {
        low: BandText {
            diagnosis: "Su probabilidad de depresión está en un rango bajo.",
            recommendations: &[
                "Hable con un amigo o familiar de confianza sobre cómo se siente y busque actividades que le brinden placer y distracción.",
            ],
        },
        moderate: BandText {
            diagnosis: "Su probabilidad de depresión es moderada.",
            recommendations: &[
                "Considere hablar con un profesional de la salud mental para obtener apoyo adicional y considerar la terapia cognitivo-conductual.",
                "Mantenga horarios regulares de sueño, alimentación y actividad física.",
            ],
        },
        moderately_high: BandText {
            diagnosis: "Su probabilidad de depresión es moderadamente alta.",
            recommendations: &[
                "Es importante buscar ayuda profesional y considerar opciones de tratamiento, como la terapia y, posiblemente, la medicación.",
                "Informe a alguien de confianza sobre cómo se siente para no afrontar la situación en soledad.",
                "Evite el consumo de alcohol y otras sustancias que puedan empeorar su estado de ánimo.",
            ],
        },
        high: BandText {
            diagnosis: "Su probabilidad de depresión es alta.",
            recommendations: &[
                "Se recomienda encarecidamente buscar ayuda profesional de inmediato y considerar opciones de tratamiento intensivo, como la hospitalización o la terapia intensiva.",
                "Si tiene pensamientos de hacerse daño, contacte de inmediato con los servicios de emergencia o una línea de atención en crisis.",
                "No interrumpa ni modifique ninguna medicación sin consultar a su médico.",
                "Apóyese en su red cercana y mantenga contacto diario con personas de confianza.",
            ],
        },
    },
};

fn network() -> Result<BayesianNetwork, ModelValidationError> {
    BayesianNetwork::builder()
        .cpd(TabularCpd::root("FactoresAmbientales", &[0.9, 0.1]))
        .cpd(TabularCpd::root("Habitos", &[0.8, 0.2]))
        .cpd(TabularCpd::root("CausasPsicologicas", &[0.7, 0.3]))
        .cpd(TabularCpd::root("CambiosHormonales", &[0.85, 0.15]))
        .cpd(TabularCpd::root("Medicación", &[0.6, 0.4]))
        .cpd(TabularCpd::root("Consecuencias", &[0.75, 0.25]))
        .cpd(TabularCpd::root("CausasFisiologicas", &[0.7, 0.3]))
        .cpd(TabularCpd::conditional(
            "FactoresBiologicos",
            &[
                &[
                    0.9, 0.8, 0.7, 0.6, 0.8, 0.7, 0.6, 0.5, 0.7, 0.6, 0.5, 0.4, 0.6, 0.5, 0.4, 0.3,
                ],
                &[
                    0.1, 0.2, 0.3, 0.4, 0.2, 0.3, 0.4, 0.5, 0.3, 0.4, 0.5, 0.6, 0.4, 0.5, 0.6, 0.7,
                ],
            ],
            &[
                "CambiosHormonales",
                "Medicación",
                "Consecuencias",
                "CausasFisiologicas",
            ],
        ))
        .cpd(TabularCpd::conditional(
            "Depresion",
            &[
                &[
                    0.9, 0.7, 0.5, 0.3, 0.7, 0.5, 0.3, 0.1, 0.5, 0.3, 0.1, 0.05, 0.3, 0.1, 0.05,
                    0.02,
                ],
                &[
                    0.1, 0.3, 0.5, 0.7, 0.3, 0.5, 0.7, 0.9, 0.5, 0.7, 0.9, 0.95, 0.7, 0.9, 0.95,
                    0.98,
                ],
            ],
            &[
                "FactoresAmbientales",
                "Habitos",
                "CausasPsicologicas",
                "FactoresBiologicos",
            ],
        ))
        .build()
}

fn environmental_factors(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    recommend_on_yes(memory, context, "factores_ambientales", "Busque apoyo profesional.")
}

fn habits(memory: &WorkingMemory, context: &mut StageContext<'_>) -> Result<(), DiagnosticError> {
    recommend_on_yes(memory, context, "habitos", "Mejore sus hábitos de vida.")
}

fn psychological_causes(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    recommend_on_yes(
        memory,
        context,
        "causas_psicologicas",
        "Considere la terapia cognitivo-conductual.",
    )
}

fn hormonal_changes(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    recommend_on_yes(
        memory,
        context,
        "cambios_hormonales",
        "Evalúe sus cambios hormonales con un profesional.",
    )
}

fn medication(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    recommend_on_yes(memory, context, "medicacion", "Revise sus medicamentos con un médico.")
}

fn consequences(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    recommend_on_yes(
        memory,
        context,
        "consecuencias",
        "Considere hablar con un terapeuta sobre las consecuencias significativas en su vida.",
    )
}

fn physiological_causes(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    recommend_on_yes(
        memory,
        context,
        "causas_fisiologicas",
        "Consulte con un profesional de la salud para tratar las causas fisiológicas.",
    )
}
