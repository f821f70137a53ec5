use std::fmt;

use serde::{Deserialize, Serialize};

/// Clinical classification of an interaction's recommendation text.
///
/// Severity is derived, never authored directly: it is recomputed from the
/// `reco` text whenever an interaction is projected, so the projected value is
/// always consistent with the current recommendation. On the wire it is a bare
/// string; `Unknown` maps to the empty string, which is how unclassified
/// interactions appear in the historical log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    #[serde(rename = "")]
    Unknown,
}

impl Severity {
    /// Parse an explicit severity label from a legacy payload.
    ///
    /// Empty or unrecognized labels return `None`, which tells the reducer to
    /// derive the severity from the recommendation text instead.
    pub fn parse(label: &str) -> Option<Severity> {
        match label {
            "Mild" => Some(Severity::Mild),
            "Moderate" => Some(Severity::Moderate),
            "Severe" => Some(Severity::Severe),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
            Severity::Unknown => "",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive a severity from recommendation text.
///
/// Precedence: `CONTRE-INDICATION` wins over `DECONSEILLEE`; any other
/// non-empty text is `Mild`; empty text is `Unknown`.
pub fn derive_severity(reco: &str) -> Severity {
    if reco.contains("CONTRE-INDICATION") {
        Severity::Severe
    } else if reco.contains("DECONSEILLEE") {
        Severity::Moderate
    } else if !reco.is_empty() {
        Severity::Mild
    } else {
        Severity::Unknown
    }
}
