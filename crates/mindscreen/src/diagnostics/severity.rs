use serde::{Deserialize, Serialize};

const PROBABILITY_DISPLAY_SCALE: f64 = 10_000.0;

/// Posterior bands, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    /// Below the lowest threshold; no band text is emitted.
    Unlabeled,
    Low,
    Moderate,
    ModeratelyHigh,
    High,
}

impl SeverityBand {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.60 {
            Self::High
        } else if probability >= 0.50 {
            Self::ModeratelyHigh
        } else if probability >= 0.40 {
            Self::Moderate
        } else if probability >= 0.30 {
            Self::Low
        } else {
            Self::Unlabeled
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unlabeled => "unlabeled",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::ModeratelyHigh => "moderately high",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BandText {
    pub diagnosis: &'static str,
    pub recommendations: &'static [&'static str],
}

/// Per-condition text for each labeled band.
#[derive(Debug, Clone, Copy)]
pub struct BandGuidance {
    pub low: BandText,
    pub moderate: BandText,
    pub moderately_high: BandText,
    pub high: BandText,
}

impl BandGuidance {
    pub fn for_band(&self, band: SeverityBand) -> Option<&BandText> {
        match band {
            SeverityBand::Unlabeled => None,
            SeverityBand::Low => Some(&self.low),
            SeverityBand::Moderate => Some(&self.moderate),
            SeverityBand::ModeratelyHigh => Some(&self.moderately_high),
            SeverityBand::High => Some(&self.high),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub probability: f64,
    pub band: SeverityBand,
}

/// Insomnia Severity Index reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsiInterpretation {
    NotClinicallySignificant,
    Subthreshold,
    Moderate,
    Severe,
}

impl IsiInterpretation {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=7 => Self::NotClinicallySignificant,
            8..=14 => Self::Subthreshold,
            15..=21 => Self::Moderate,
            _ => Self::Severe,
        }
    }

    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::NotClinicallySignificant => "Insomnio sin significancia clínica.",
            Self::Subthreshold => "Insomnio subumbral.",
            Self::Moderate => "Insomnio moderado.",
            Self::Severe => "Insomnio severo.",
        }
    }
}

/// Probability as shown to respondents: four decimals, shortest form.
pub fn display_probability(probability: f64) -> String {
    let rounded = (probability * PROBABILITY_DISPLAY_SCALE).round() / PROBABILITY_DISPLAY_SCALE;
    format!("{rounded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_use_inclusive_lower_thresholds() {
        let cases = [
            (0.0, SeverityBand::Unlabeled),
            (0.2999999999, SeverityBand::Unlabeled),
            (0.30, SeverityBand::Low),
            (0.3999, SeverityBand::Low),
            (0.40, SeverityBand::Moderate),
            (0.50, SeverityBand::ModeratelyHigh),
            (0.5999, SeverityBand::ModeratelyHigh),
            (0.60, SeverityBand::High),
            (1.0, SeverityBand::High),
        ];
        for (probability, band) in cases {
            assert_eq!(SeverityBand::from_probability(probability), band, "{probability}");
        }
        assert!(SeverityBand::High > SeverityBand::ModeratelyHigh);
        assert!(SeverityBand::Low > SeverityBand::Unlabeled);
    }

    #[test]
    fn isi_thresholds() {
        assert_eq!(IsiInterpretation::from_score(7), IsiInterpretation::NotClinicallySignificant);
        assert_eq!(IsiInterpretation::from_score(8), IsiInterpretation::Subthreshold);
        assert_eq!(IsiInterpretation::from_score(14), IsiInterpretation::Subthreshold);
        assert_eq!(IsiInterpretation::from_score(21), IsiInterpretation::Moderate);
        assert_eq!(IsiInterpretation::from_score(22), IsiInterpretation::Severe);
        assert_eq!(
            IsiInterpretation::from_score(10).recommendation(),
            "Insomnio subumbral."
        );
    }

    #[test]
    fn probability_display_is_short() {
        assert_eq!(display_probability(0.1), "0.1");
        assert_eq!(display_probability(0.6), "0.6");
        assert_eq!(display_probability(0.7342918), "0.7343");
        assert_eq!(display_probability(1.0), "1");
    }
}
