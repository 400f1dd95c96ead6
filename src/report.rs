use chrono::{DateTime, Local};
use mindscreen::diagnostics::severity::display_probability;
use mindscreen::diagnostics::{AnalysisReport, BatchOutcome, Condition, Quiz};

pub(crate) fn render_quiz(condition: Condition, quiz: &Quiz) -> String {
    let mut out = format!("{} ({condition})\n", condition.label());
    for (position, question) in quiz.questions.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. [{}] {}\n",
            position + 1,
            question.fact_key,
            question.statement
        ));
        for (index, option) in question.options.iter().enumerate() {
            out.push_str(&format!("   {}) {option}\n", index + 1));
        }
    }
    out
}

pub(crate) fn render_report(report: &AnalysisReport) -> String {
    render_report_at(report, Local::now())
}

fn render_report_at(report: &AnalysisReport, generated: DateTime<Local>) -> String {
    let mut out = format!(
        "{} analysis ({})\n",
        report.condition.label(),
        generated.format("%Y-%m-%d %H:%M")
    );
    out.push_str(&format!("Stages fired: {}\n", report.stages.join(" -> ")));

    if let Some(risk) = report.risk {
        out.push_str(&format!(
            "Risk: {} ({})\n",
            display_probability(risk.probability),
            risk.band.label()
        ));
    }

    push_section(&mut out, "Diagnosis", &report.diagnosis);
    push_section(&mut out, "Recommendations", &report.recommendations);
    out
}

pub(crate) fn render_batch(condition: Condition, outcomes: &[BatchOutcome]) -> String {
    let failed = outcomes.iter().filter(|outcome| outcome.error.is_some()).count();
    let mut out = format!(
        "{} batch: {} sheets, {} rejected ({})\n",
        condition.label(),
        outcomes.len(),
        failed,
        Local::now().format("%Y-%m-%d %H:%M")
    );
    for outcome in outcomes {
        let line = match (&outcome.report, &outcome.error) {
            (Some(report), _) => match report.risk {
                Some(risk) => format!(
                    "- {}: {} ({})",
                    outcome.respondent,
                    display_probability(risk.probability),
                    risk.band.label()
                ),
                None => format!("- {}: {}", outcome.respondent, report.diagnosis.join(", ")),
            },
            (None, Some(error)) => format!("- {}: rejected, {error}", outcome.respondent),
            (None, None) => format!("- {}: no result", outcome.respondent),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn push_section(out: &mut String, title: &str, lines: &[String]) {
    if lines.is_empty() {
        out.push_str(&format!("\n{title}: none\n"));
        return;
    }
    out.push_str(&format!("\n{title}\n"));
    for line in lines {
        out.push_str(&format!("- {line}\n"));
    }
}
