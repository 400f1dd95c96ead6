use super::common::*;

use crate::diagnostics::assessment::Assessment;
use crate::diagnostics::bayes::Evidence;
use crate::diagnostics::domain::{AnswerValue, Condition, DiagnosticError};
use crate::diagnostics::evidence::EvidencePolicy;
use crate::diagnostics::registry::profile;
use crate::diagnostics::severity::{IsiInterpretation, SeverityBand};

const IMMEDIATE_HELP: &str = "de inmediato";

#[test]
fn anxiety_all_negative_evidence_reports_only_the_probability_line() {
    let report = service()
        .report("anxiety", &anxiety_answers("2", "3", "5", "3"))
        .expect("analysis succeeds");

    let risk = report.risk.expect("risk stage ran");
    assert_eq!(risk.probability, 0.1);
    assert_eq!(risk.band, SeverityBand::Unlabeled);
    assert!(report
        .recommendations
        .contains(&"Probabilidad calculada de ansiedad: 0.1".to_string()));
    assert!(
        !report.diagnosis.iter().any(|line| line.starts_with("Su probabilidad")),
        "no band text below 0.30: {:?}",
        report.diagnosis
    );
}

#[test]
fn anxiety_all_positive_evidence_reaches_the_high_band() {
    let report = service()
        .report("anxiety", &anxiety_answers("1", "1", "1", "1"))
        .expect("analysis succeeds");

    let risk = report.risk.expect("risk stage ran");
    assert_eq!(risk.probability, 0.6);
    assert_eq!(risk.band, SeverityBand::High);
    assert!(report.diagnosis.iter().any(|line| line.contains("alta")));

    let band_lines = profile(Condition::Anxiety)
        .expect("anxiety profile")
        .bands
        .high
        .recommendations;
    assert!(band_lines.len() >= 5);
    for line in band_lines {
        assert!(report
            .recommendations
            .iter()
            .any(|advice| advice.as_str() == *line));
    }
    assert!(report
        .recommendations
        .iter()
        .any(|advice| advice.contains(IMMEDIATE_HELP)));
}

#[test]
fn anxiety_stage_findings_follow_answers() {
    let result = service()
        .report("anxiety", &anxiety_answers("1", "3", "2", "1"))
        .expect("analysis succeeds");

    assert_eq!(
        result.diagnosis[0],
        "Síntomas de ansiedad: Preocupación excesiva, Tensión muscular"
    );
    assert_eq!(result.diagnosis[1], "Impacto en la vida diaria: Un poco");
    assert!(result
        .diagnosis
        .contains(&"Uso de medicación potencialmente influyente: Estimulantes".to_string()));
    assert!(result
        .recommendations
        .contains(&"Incorpore ejercicio regular en su rutina diaria.".to_string()));
    assert!(result
        .recommendations
        .contains(&"Intente mejorar su higiene del sueño.".to_string()));
}

#[test]
fn band_recommendation_counts_escalate() {
    // Columns of the anxiety table: 0.2, 0.3, 0.4, 0.5 and 0.6.
    let cases = [
        (("2", "3", "5", "1"), SeverityBand::Unlabeled, 0),
        (("2", "3", "1", "3"), SeverityBand::Low, 1),
        (("2", "3", "1", "1"), SeverityBand::Moderate, 2),
        (("2", "1", "1", "1"), SeverityBand::ModeratelyHigh, 3),
        (("1", "1", "1", "1"), SeverityBand::High, 4),
    ];
    let guidance = profile(Condition::Anxiety).expect("anxiety profile").bands;

    for ((sleep, lifestyle, medication, psychological), band, minimum) in cases {
        let report = service()
            .report(
                "anxiety",
                &anxiety_answers(sleep, lifestyle, medication, psychological),
            )
            .expect("analysis succeeds");
        assert_eq!(report.risk.map(|risk| risk.band), Some(band));
        let emitted = guidance
            .for_band(band)
            .map_or(0, |text| text.recommendations.len());
        assert!(emitted >= minimum, "{band:?} emits {emitted} lines");
    }
}

#[test]
fn every_high_band_offers_immediate_help() {
    for condition in Condition::specific() {
        let high = profile(condition).expect("profile").bands.high;
        assert!(
            high.recommendations
                .iter()
                .any(|line| line.contains(IMMEDIATE_HELP)),
            "{condition} high band lacks an immediate-help item"
        );
    }
}

#[test]
fn insomnia_isi_interpretation_is_independent_of_risk() {
    for positive in [false, true] {
        let report = service()
            .report("insomnia", &insomnia_answers("10", positive))
            .expect("analysis succeeds");

        assert_eq!(report.isi, Some(IsiInterpretation::Subthreshold));
        assert!(report
            .recommendations
            .contains(&"Insomnio subumbral.".to_string()));
        assert!(report.diagnosis.contains(&"Puntuación ISI: 10".to_string()));
    }
}

#[test]
fn insomnia_final_recommendations_depend_on_isi_total() {
    let mild = service()
        .report("insomnia", &insomnia_answers("10", false))
        .expect("analysis succeeds");
    assert_eq!(
        mild.recommendations.last().map(String::as_str),
        Some("- Practicar técnicas de relajación antes de acostarse.")
    );
    assert_eq!(mild.risk.map(|risk| risk.probability), Some(0.1));

    let severe = service()
        .report("insomnia", &insomnia_answers("4,4,4,4,4,4,2", true))
        .expect("analysis succeeds");
    assert_eq!(severe.isi, Some(IsiInterpretation::Severe));
    assert_eq!(severe.risk.map(|risk| risk.band), Some(SeverityBand::High));
    assert!(severe.recommendations.last().is_some_and(|line| line.contains("consulte")));
}

#[test]
fn depression_and_stress_posteriors() {
    let service = service();

    let depression_low = service
        .report("depression", &yes_no_answers(DEPRESSION_KEYS, "2"))
        .expect("analysis succeeds");
    assert_eq!(depression_low.risk.map(|risk| risk.probability), Some(0.12));
    assert_eq!(depression_low.recommendations.len(), 1);

    let depression_high = service
        .report("depression", &yes_no_answers(DEPRESSION_KEYS, "1"))
        .expect("analysis succeeds");
    assert_eq!(depression_high.risk.map(|risk| risk.probability), Some(0.971));
    assert!(depression_high
        .recommendations
        .contains(&"Probabilidad calculada de depresión: 0.971".to_string()));
    assert!(depression_high
        .recommendations
        .contains(&"Revise sus medicamentos con un médico.".to_string()));

    let stress_low = service
        .report("stress", &yes_no_answers(STRESS_KEYS, "2"))
        .expect("analysis succeeds");
    assert_eq!(stress_low.risk.map(|risk| risk.probability), Some(0.15));

    let stress_high = service
        .report("stress", &yes_no_answers(STRESS_KEYS, "1"))
        .expect("analysis succeeds");
    assert_eq!(stress_high.risk.map(|risk| risk.probability), Some(0.61));
    assert_eq!(stress_high.risk.map(|risk| risk.band), Some(SeverityBand::High));
}

#[test]
fn stage_chains_fire_each_stage_exactly_once() {
    let cases = [
        (Condition::Anxiety, anxiety_answers("1", "2", "3", "2"), 8),
        (Condition::Depression, yes_no_answers(DEPRESSION_KEYS, "1"), 8),
        (Condition::Insomnia, insomnia_answers("21", true), 10),
        (Condition::Stress, yes_no_answers(STRESS_KEYS, "2"), 9),
    ];

    for (condition, answers, stages) in cases {
        let report = service()
            .report(condition.key(), &answers)
            .expect("analysis succeeds");
        assert_eq!(report.stages.len(), stages, "{condition}");

        let chain = profile(condition).expect("profile").chain;
        assert_eq!(report.stages, chain.tokens().collect::<Vec<_>>());
        assert!(report.stages.contains(&"evaluate_risk"));
    }
}

#[test]
fn missing_answer_fails_before_any_stage_fires() {
    let catalog = catalog();
    let mut module = catalog
        .assessment(Condition::Anxiety, EvidencePolicy::Strict)
        .expect("anxiety module");
    let mut answers = anxiety_answers("1", "1", "1", "1");
    answers.remove("daytime_impact");

    let error = module.input_data(&answers).expect_err("answer missing");

    assert!(matches!(
        error,
        DiagnosticError::MissingEvidence {
            condition: Condition::Anxiety,
            key: "daytime_impact"
        }
    ));
    assert!(module.memory().is_empty());
    assert!(module.diagnosis().is_empty());
    assert!(module.recommendations().is_empty());
}

#[test]
fn unknown_condition_is_rejected() {
    let service = service();
    for raw in ["unknown_key", " ANXIETY ", "Anxiety"] {
        let error = service
            .analyze(raw, &anxiety_answers("1", "1", "1", "1"))
            .expect_err("no such module");
        assert!(
            matches!(&error, DiagnosticError::UnknownCondition(key) if key == raw),
            "unexpected error for {raw:?}: {error:?}"
        );
    }
}

#[test]
fn run_requires_input_and_facts_are_write_once() {
    let catalog = catalog();
    let mut module = catalog
        .assessment(Condition::Depression, EvidencePolicy::Strict)
        .expect("depression module");

    assert!(matches!(
        module.run(),
        Err(DiagnosticError::NotPrimed(Condition::Depression))
    ));

    let answers = yes_no_answers(DEPRESSION_KEYS, "1");
    module.input_data(&answers).expect("first input");
    assert!(matches!(
        module.input_data(&answers),
        Err(DiagnosticError::FactAlreadyDeclared("factores_ambientales"))
    ));
}

#[test]
fn reset_allows_reuse_with_fresh_results() {
    let catalog = catalog();
    let mut module = catalog
        .assessment(Condition::Stress, EvidencePolicy::Strict)
        .expect("stress module");

    module
        .input_data(&yes_no_answers(STRESS_KEYS, "1"))
        .expect("input");
    module.run().expect("first run");
    let first = module.recommendations().len();

    module.reset();
    module
        .input_data(&yes_no_answers(STRESS_KEYS, "2"))
        .expect("input after reset");
    module.run().expect("second run");

    assert!(module.recommendations().len() < first);
    assert_eq!(module.result().risk.map(|risk| risk.probability), Some(0.15));
}

#[test]
fn invalid_answers_are_rejected_with_the_offending_key() {
    let mut answers = anxiety_answers("1", "1", "1", "1");
    answers.insert("daytime_impact".into(), AnswerValue::Text("9".into()));

    let error = service()
        .analyze("anxiety", &answers)
        .expect_err("option 9 does not exist");
    assert!(matches!(
        error,
        DiagnosticError::InvalidAnswer {
            key: "daytime_impact",
            ..
        }
    ));
}

#[test]
fn every_answer_option_maps_to_evidence() {
    for condition in Condition::specific() {
        let condition_profile = profile(condition).expect("profile");
        for rule in condition_profile.evidence.rules() {
            let question = condition_profile.quiz.question(rule.fact).expect("fact is asked");
            for code in 1..=question.options.len() as u8 {
                assert!(
                    rule.state_for(code).is_some(),
                    "{condition}: option {code} of {} is unmapped",
                    rule.fact
                );
            }
        }
    }
}

#[test]
fn every_network_column_is_normalized() {
    let catalog = catalog();
    for condition in Condition::specific() {
        let model = catalog.model(condition).expect("model loaded");
        let network = model.network();
        let mut checked = 0;
        for cpd in network.cpds() {
            for column in 0..cpd.values()[0].len() {
                let sum: f64 = cpd.values().iter().map(|row| row[column]).sum();
                assert!(
                    (sum - 1.0).abs() < 1e-6,
                    "{condition}/{} column {column}",
                    cpd.variable()
                );
            }
            checked += 1;
        }
        assert_eq!(checked, network.len(), "{condition}");
    }
    let stress = catalog.model(Condition::Stress).expect("model loaded");
    for latent in ["FactoresAmbientales", "FactoresInternos", "FactoresPersonalesSociales"] {
        assert!(stress.network().cpds().any(|cpd| cpd.variable() == latent), "{latent}");
    }
}

#[test]
fn posterior_queries_are_deterministic() {
    let catalog = catalog();
    let model = catalog.model(Condition::Depression).expect("model");
    let evidence = Evidence::new()
        .with("FactoresAmbientales", 1)
        .with("Habitos", 0)
        .with("CausasPsicologicas", 1)
        .with("CambiosHormonales", 0)
        .with("Medicación", 1)
        .with("Consecuencias", 1)
        .with("CausasFisiologicas", 0);

    let first = model.probability(&evidence).expect("posterior");
    let second = model.probability(&evidence).expect("posterior");
    assert_eq!(first.to_bits(), second.to_bits());
}

#[test]
fn bands_are_monotonic_in_probability() {
    let mut previous = SeverityBand::from_probability(0.0);
    for step in 1..=1000 {
        let band = SeverityBand::from_probability(f64::from(step) / 1000.0);
        assert!(band >= previous);
        previous = band;
    }
}
