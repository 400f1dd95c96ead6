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
            "cuestiones_cronicas",
            "¿Tiene cuestiones crónicas que le generen estrés?",
            YES_NO,
        ),
        Question::single(
            "situaciones_cotidianas",
            "¿Experimenta situaciones cotidianas estresantes frecuentemente?",
            YES_NO,
        ),
        Question::single(
            "sucesos_vitales",
            "¿Ha experimentado algún suceso vital estresante recientemente?",
            YES_NO,
        ),
        Question::single(
            "susceptibilidad_interna",
            "¿Tiene predisposición fisiológica al estrés?",
            YES_NO,
        ),
        Question::single(
            "valoracion_cognitiva",
            "¿Suele tener pensamientos negativos sobre las situaciones?",
            YES_NO,
        ),
        Question::single(
            "relaciones_interpersonales",
            "¿Tiene conflictos en sus relaciones interpersonales?",
            YES_NO,
        ),
        Question::single("presion_laboral", "¿Siente presión laboral o académica?", YES_NO),
        Question::single("falta_apoyo_social", "¿Le falta apoyo social?", YES_NO),
    ],
};

const EVIDENCE: &[EvidenceRule] = &[
    EvidenceRule::new("CuestionesCronicas", "cuestiones_cronicas", &[1], &[2]),
    EvidenceRule::new("SituacionesCotidianas", "situaciones_cotidianas", &[1], &[2]),
    EvidenceRule::new("SucesosVitales", "sucesos_vitales", &[1], &[2]),
    EvidenceRule::new("SusceptibilidadInterna", "susceptibilidad_interna", &[1], &[2]),
    EvidenceRule::new("ValoracionCognitiva", "valoracion_cognitiva", &[1], &[2]),
    EvidenceRule::new("RelacionesInterpersonales", "relaciones_interpersonales", &[1], &[2]),
    EvidenceRule::new("PresionLaboralAcademica", "presion_laboral", &[1], &[2]),
    EvidenceRule::new("FaltaApoyoSocial", "falta_apoyo_social", &[1], &[2]),
];

const STAGES: &[Stage] = &[
    Stage {
        token: "cuestiones_cronicas",
        requires: &["cuestiones_cronicas"],
        handler: chronic_issues,
    },
    Stage {
        token: "situaciones_cotidianas",
        requires: &["situaciones_cotidianas"],
        handler: daily_situations,
    },
    Stage {
        token: "sucesos_vitales",
        requires: &["sucesos_vitales"],
        handler: life_events,
    },
    Stage {
        token: "susceptibilidad_interna",
        requires: &["susceptibilidad_interna"],
        handler: internal_susceptibility,
    },
    Stage {
        token: "valoracion_cognitiva",
        requires: &["valoracion_cognitiva"],
        handler: cognitive_appraisal,
    },
    Stage {
        token: "relaciones_interpersonales",
        requires: &["relaciones_interpersonales"],
        handler: relationships,
    },
    Stage {
        token: "presion_laboral",
        requires: &["presion_laboral"],
        handler: work_pressure,
    },
    Stage {
        token: "falta_apoyo_social",
        requires: &["falta_apoyo_social"],
        handler: social_support,
    },
    Stage {
        token: "evaluate_risk",
        requires: &[
            "cuestiones_cronicas",
            "situaciones_cotidianas",
            "sucesos_vitales",
            "susceptibilidad_interna",
            "valoracion_cognitiva",
            "relaciones_interpersonales",
            "presion_laboral",
            "falta_apoyo_social",
        ],
        handler: evaluate_risk,
    },
];

pub static PROFILE: ConditionProfile = ConditionProfile {
    condition: Condition::Stress,
    subject: "estrés",
    quiz: &QUIZ,
    chain: StageChain::new(STAGES),
    evidence: EvidenceMapper::new(EVIDENCE),
    outcome: "Estrés",
    network,
    bands: BandGuidance {
        low: BandText {
            diagnosis: "Su probabilidad de estrés está en un rango bajo.",
            recommendations: &[
                "Siga practicando técnicas de manejo del estrés y busque mantener un equilibrio saludable en su vida diaria.",
            ],
        },
        moderate: BandText {
            diagnosis: "Su probabilidad de estrés es moderada.",
            recommendations: &[
                "Además de las técnicas de manejo del estrés, considere hablar con un profesional de la salud mental para obtener apoyo adicional.",
                "Reserve cada día un tiempo para actividades que le resulten relajantes.",
            ],
        },
        moderately_high: BandText {
            diagnosis: "Su probabilidad de estrés es moderadamente alta.",
            recommendations: &[
                "Es importante buscar formas adicionales de reducir el estrés, como practicar actividades físicas regularmente y establecer límites saludables.",
                "Considere consultar con un profesional de la salud mental para elaborar un plan de manejo del estrés.",
                "Revise sus compromisos y delegue o posponga las tareas que no sean prioritarias.",
            ],
        },
        high: BandText {
            diagnosis: "Su probabilidad de estrés es alta.",
            recommendations: &[
                "Se recomienda encarecidamente buscar ayuda profesional de inmediato para abordar y gestionar su estrés de manera efectiva.",
                "Hable con su médico si nota síntomas físicos persistentes como dolores de cabeza, palpitaciones o problemas digestivos.",
                "Priorice el descanso y reduzca temporalmente su carga de responsabilidades.",
                "Apóyese en familiares y amigos, y considere unirse a un grupo de apoyo.",
            ],
        },
    },
};

fn network() -> Result<BayesianNetwork, ModelValidationError> {
    BayesianNetwork::builder()
        .cpd(TabularCpd::root("CuestionesCronicas", &[0.8, 0.2]))
        .cpd(TabularCpd::root("SituacionesCotidianas", &[0.85, 0.15]))
        .cpd(TabularCpd::root("SucesosVitales", &[0.9, 0.1]))
        .cpd(TabularCpd::conditional(
            "FactoresAmbientales",
            &[
                &[0.9, 0.7, 0.5, 0.3, 0.7, 0.5, 0.3, 0.1],
                &[0.1, 0.3, 0.5, 0.7, 0.3, 0.5, 0.7, 0.9],
            ],
            &["CuestionesCronicas", "SituacionesCotidianas", "SucesosVitales"],
        ))
        .cpd(TabularCpd::root("SusceptibilidadInterna", &[0.75, 0.25]))
        .cpd(TabularCpd::root("ValoracionCognitiva", &[0.7, 0.3]))
        .cpd(TabularCpd::conditional(
            "FactoresInternos",
            &[&[0.9, 0.6, 0.3, 0.1], &[0.1, 0.4, 0.7, 0.9]],
            &["SusceptibilidadInterna", "ValoracionCognitiva"],
        ))
        .cpd(TabularCpd::root("RelacionesInterpersonales", &[0.65, 0.35]))
        .cpd(TabularCpd::root("PresionLaboralAcademica", &[0.6, 0.4]))
        .cpd(TabularCpd::conditional(
            "FactoresPersonalesSociales",
            &[&[0.9, 0.7, 0.5, 0.3], &[0.1, 0.3, 0.5, 0.7]],
            &["RelacionesInterpersonales", "PresionLaboralAcademica"],
        ))
        .cpd(TabularCpd::root("FaltaApoyoSocial", &[0.55, 0.45]))
        .cpd(TabularCpd::conditional(
            "Estrés",
            &[
                &[
                    0.9, 0.8, 0.7, 0.6, 0.8, 0.7, 0.6, 0.5, 0.7, 0.6, 0.5, 0.4, 0.6, 0.5, 0.4, 0.3,
                ],
                &[
                    0.1, 0.2, 0.3, 0.4, 0.2, 0.3, 0.4, 0.5, 0.3, 0.4, 0.5, 0.6, 0.4, 0.5, 0.6, 0.7,
                ],
            ],
            &[
                "FactoresAmbientales",
                "FactoresInternos",
                "FactoresPersonalesSociales",
                "FaltaApoyoSocial",
            ],
        ))
        .build()
}

fn chronic_issues(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    recommend_on_yes(
        memory,
        context,
        "cuestiones_cronicas",
        "Busque apoyo profesional para tratar condiciones crónicas de estrés.",
    )
}

fn daily_situations(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    recommend_on_yes(
        memory,
        context,
        "situaciones_cotidianas",
        "Pruebe técnicas de relajación y mindfulness para reducir el estrés diario.",
    )
}

fn life_events(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    recommend_on_yes(
        memory,
        context,
        "sucesos_vitales",
        "Considere técnicas de manejo del estrés para eventos recientes.",
    )
}

fn internal_susceptibility(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    recommend_on_yes(
        memory,
        context,
        "susceptibilidad_interna",
        "Evalúe su predisposición fisiológica con un profesional de la salud.",
    )
}

fn cognitive_appraisal(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    recommend_on_yes(
        memory,
        context,
        "valoracion_cognitiva",
        "Trabaje en la reestructuración cognitiva para mejorar sus pensamientos negativos.",
    )
}

fn relationships(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    recommend_on_yes(
        memory,
        context,
        "relaciones_interpersonales",
        "Fortalezca sus relaciones interpersonales y resuelva conflictos de manera asertiva.",
    )
}

fn work_pressure(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    recommend_on_yes(
        memory,
        context,
        "presion_laboral",
        "Gestione su carga laboral y busque equilibrio entre trabajo y vida personal.",
    )
}

fn social_support(
    memory: &WorkingMemory,
    context: &mut StageContext<'_>,
) -> Result<(), DiagnosticError> {
    recommend_on_yes(
        memory,
        context,
        "falta_apoyo_social",
        "Busque construir una red de apoyo social para mejorar su bienestar.",
    )
}
