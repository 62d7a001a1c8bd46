//! Generated study-aid artifacts and the structured-response contract.
//!
//! Providers are asked for bare JSON, but in practice responses sometimes
//! arrive wrapped in a markdown code fence. Parsing strips one enclosing
//! fence, then requires the payload to match the requested artifact's schema
//! exactly; anything else is a `GenerationParseError` scoped to that artifact.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenerationParseError;

/// The four kinds of study aid the pipeline can generate for a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    Takeaways,
    ReviewQuestions,
    Scenario,
    FurtherStudy,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Takeaways,
        ArtifactKind::ReviewQuestions,
        ArtifactKind::Scenario,
        ArtifactKind::FurtherStudy,
    ];
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Takeaways => "takeaways",
            ArtifactKind::ReviewQuestions => "review-questions",
            ArtifactKind::Scenario => "scenario",
            ArtifactKind::FurtherStudy => "further-study",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "takeaways" => Ok(ArtifactKind::Takeaways),
            "review-questions" => Ok(ArtifactKind::ReviewQuestions),
            "scenario" => Ok(ArtifactKind::Scenario),
            "further-study" => Ok(ArtifactKind::FurtherStudy),
            other => Err(format!(
                "unknown artifact kind: {other} (expected takeaways, review-questions, scenario, or further-study)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Artifact payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeawaysPayload {
    pub key_takeaways: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewQuestionsPayload {
    pub review_questions: Vec<ReviewQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewQuestion {
    pub question: String,
    /// Present for multiple-choice questions, absent for open ones.
    #[serde(default)]
    pub options: Option<Vec<String>>,
    pub answer: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPayload {
    pub practical_scenario: PracticalScenario,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticalScenario {
    pub description: String,
    #[serde(default)]
    pub guidance: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurtherStudyPayload {
    pub further_study_recommendations: Vec<StudyResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyResource {
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
    pub description: String,
}

/// A successfully parsed artifact, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeneratedArtifact {
    Takeaways(TakeawaysPayload),
    ReviewQuestions(ReviewQuestionsPayload),
    Scenario(ScenarioPayload),
    FurtherStudy(FurtherStudyPayload),
}

impl GeneratedArtifact {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            GeneratedArtifact::Takeaways(_) => ArtifactKind::Takeaways,
            GeneratedArtifact::ReviewQuestions(_) => ArtifactKind::ReviewQuestions,
            GeneratedArtifact::Scenario(_) => ArtifactKind::Scenario,
            GeneratedArtifact::FurtherStudy(_) => ArtifactKind::FurtherStudy,
        }
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Strip one enclosing markdown code fence, if present. The opening fence may
/// carry a language tag; anything up to its first newline is dropped with it.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a provider response into the requested artifact.
pub fn parse_artifact(
    kind: ArtifactKind,
    raw: &str,
) -> Result<GeneratedArtifact, GenerationParseError> {
    let json = strip_code_fence(raw);
    let parse_error = |e: serde_json::Error| GenerationParseError {
        kind,
        reason: e.to_string(),
    };
    match kind {
        ArtifactKind::Takeaways => serde_json::from_str(json)
            .map(GeneratedArtifact::Takeaways)
            .map_err(parse_error),
        ArtifactKind::ReviewQuestions => serde_json::from_str(json)
            .map(GeneratedArtifact::ReviewQuestions)
            .map_err(parse_error),
        ArtifactKind::Scenario => serde_json::from_str(json)
            .map(GeneratedArtifact::Scenario)
            .map_err(parse_error),
        ArtifactKind::FurtherStudy => serde_json::from_str(json)
            .map(GeneratedArtifact::FurtherStudy)
            .map_err(parse_error),
    }
}
