//! Core data model for curriculum content.
//!
//! A curriculum is a tree of chapters, sections, and content nodes. Nodes are
//! a tagged union over roughly twenty kinds, several of which drive small
//! interactive widgets. Decoding is lenient and total: a node with an unknown
//! `kind` or an undecodable payload still loads, as a diagnostic node, so one
//! bad node can never abort the curriculum or its sibling nodes.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// The kinds this build understands. Used to tell "unknown kind" apart from
/// "known kind with a broken payload" during lenient decoding.
pub const KNOWN_KINDS: &[&str] = &[
    "heading",
    "h3",
    "h4",
    "paragraph",
    "list",
    "table",
    "formula",
    "chart",
    "diagram",
    "interactive-scenario",
    "practical-exercise",
    "phishing-simulator",
    "password-checker",
    "wifi-simulator",
    "cautionary-tale",
    "interactive-concept",
    "threat-explainer",
    "checklist",
    "micro-tip",
    "end-of-chapter-actions",
    "flashcard-set",
];

/// One tagged unit of curriculum content.
///
/// The raw `kind` string is retained alongside the decoded body so that
/// diagnostics can name the kind even when the payload was unusable.
#[derive(Debug, Clone)]
pub struct ContentNode {
    pub kind: String,
    pub body: NodeBody,
}

/// Decoded payload of a content node, one variant per kind, plus the two
/// lenient fallbacks produced during decoding.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NodeBody {
    Heading {
        #[serde(default = "default_heading_level")]
        level: u8,
        text: String,
    },
    /// Shorthand heading kinds used by older curriculum documents.
    H3 {
        text: String,
    },
    H4 {
        text: String,
    },
    Paragraph {
        text: String,
    },
    List {
        items: Vec<String>,
    },
    Table(TableData),
    Formula {
        formula: String,
    },
    Chart(ChartData),
    Diagram {
        definition: String,
    },
    InteractiveScenario(InteractiveScenarioData),
    PracticalExercise(PracticalExerciseData),
    PhishingSimulator(PhishingSimulatorData),
    PasswordChecker(PasswordCheckerData),
    WifiSimulator(WifiSimulatorData),
    CautionaryTale(CautionaryTaleData),
    InteractiveConcept(InteractiveConceptData),
    ThreatExplainer(ThreatExplainerData),
    Checklist(ChecklistData),
    MicroTip {
        tip: String,
    },
    EndOfChapterActions(EndOfChapterActionsData),
    FlashcardSet(FlashcardSetData),

    /// A kind this build does not understand. Renders as a visible but
    /// non-fatal placeholder.
    #[serde(skip)]
    Unsupported,

    /// A known kind whose payload failed to decode.
    #[serde(skip)]
    Malformed { reason: String },
}

fn default_heading_level() -> u8 {
    3
}

impl<'de> Deserialize<'de> for ContentNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let kind = match value.get("kind").and_then(Value::as_str) {
            Some(k) => k.to_string(),
            None => return Err(D::Error::custom("content node is missing a kind tag")),
        };

        let body = match serde_json::from_value::<NodeBody>(value) {
            Ok(body) => body,
            Err(e) if KNOWN_KINDS.contains(&kind.as_str()) => NodeBody::Malformed {
                reason: e.to_string(),
            },
            Err(_) => NodeBody::Unsupported,
        };

        Ok(ContentNode { kind, body })
    }
}

// ---------------------------------------------------------------------------
// Presentational payloads
// ---------------------------------------------------------------------------

/// Tabular content. Rendering is a pass-through; the renderer only checks the
/// shape.
#[derive(Debug, Clone, Deserialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Chart content, handed off to an external charting layer.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartData {
    pub chart_type: ChartType,
    #[serde(default)]
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Doughnut,
    Radar,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Interactive payloads
// ---------------------------------------------------------------------------

/// A branching what-would-you-do exercise with one correct choice.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractiveScenarioData {
    pub title: String,
    pub description: String,
    pub choices: Vec<ScenarioChoice>,
    pub success_message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioChoice {
    pub id: String,
    pub text: String,
    pub feedback: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub feedback_tone: Option<FeedbackTone>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackTone {
    Success,
    Warning,
    Error,
}

/// A structured hands-on exercise: intro, ordered tasks, expected outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct PracticalExerciseData {
    pub title: String,
    pub introduction: String,
    pub tasks: Vec<ExerciseTask>,
    pub expected_outcome: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseTask {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub details: Option<String>,
}

/// An inbox-triage exercise: judge each email safe or phishing.
#[derive(Debug, Clone, Deserialize)]
pub struct PhishingSimulatorData {
    pub title: String,
    pub introduction: String,
    pub emails: Vec<PhishingEmail>,
    pub completion_message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhishingEmail {
    pub id: String,
    pub sender: String,
    pub subject: String,
    pub body_preview: String,
    #[serde(default)]
    pub full_body: Option<String>,
    pub is_phishing: bool,
    pub feedback_correct: String,
    pub feedback_incorrect: String,
    #[serde(default)]
    pub clues: Vec<String>,
}

/// Live password-strength meter driven by weighted pattern criteria.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordCheckerData {
    pub title: String,
    #[serde(default)]
    pub disclaimer: Option<String>,
    pub criteria: Vec<PasswordCriterion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordCriterion {
    pub id: String,
    /// Regex the sample password is tested against.
    pub pattern: String,
    /// Tip shown for this criterion (e.g. "Add a number").
    pub message: String,
    /// Contribution to the 0-100 score when the pattern matches.
    pub weight: i32,
}

/// Pick-a-network exercise for public Wi-Fi hygiene.
#[derive(Debug, Clone, Deserialize)]
pub struct WifiSimulatorData {
    pub title: String,
    pub scenario_description: String,
    pub networks: Vec<WifiNetwork>,
    #[serde(default)]
    pub general_advice: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WifiNetwork {
    pub id: String,
    pub ssid: String,
    /// e.g. "Open", "WPA2-PSK", "WPA3-SAE", "Captive Portal"
    pub security: String,
    #[serde(default)]
    pub is_recommended: bool,
    pub feedback: String,
    /// 1-5 bars.
    #[serde(default)]
    pub signal_strength: Option<u8>,
}

// ---------------------------------------------------------------------------
// Narrative payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CautionaryTaleData {
    pub text: String,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractiveConceptData {
    pub title: String,
    #[serde(default)]
    pub introduction: Option<String>,
    pub concepts: Vec<ConceptItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConceptItem {
    pub id: String,
    pub term: String,
    pub brief: String,
    #[serde(default)]
    pub details: Vec<ConceptDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConceptDetail {
    pub title: String,
    pub explanation: String,
    #[serde(default)]
    pub example: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreatExplainerData {
    pub title: String,
    pub introduction: String,
    pub steps: Vec<ThreatStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreatStep {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChecklistData {
    pub title: String,
    pub items: Vec<ChecklistItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub guide_link: Option<String>,
    #[serde(default)]
    pub guide_link_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndOfChapterActionsData {
    pub title: String,
    pub actions: Vec<ChapterAction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChapterAction {
    pub text: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub link_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlashcardSetData {
    pub title: String,
    pub cards: Vec<Flashcard>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub term: String,
    pub definition: String,
}

// ---------------------------------------------------------------------------
// Organizational units
// ---------------------------------------------------------------------------

/// An addressable unit holding an ordered sequence of content nodes.
#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    /// Unique within the owning chapter, e.g. "1.1".
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: Vec<ContentNode>,
}

/// An ordered group of sections. Immutable after curriculum load.
#[derive(Debug, Clone, Deserialize)]
pub struct Chapter {
    /// Unique within the curriculum, e.g. "chapter-1".
    pub id: String,
    pub title: String,
    /// Compact title for narrow listings.
    #[serde(default)]
    pub short_title: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Shown after the last section of the chapter only.
    #[serde(default)]
    pub end_of_chapter_content: Option<Vec<ContentNode>>,
}

/// The sole addressing scheme accepted by the core: a (chapter, section) pair.
/// Keys the mastery tracker and scopes the AI pipeline's context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionAddress {
    pub chapter_id: String,
    pub section_id: String,
}

impl SectionAddress {
    pub fn new(chapter_id: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self {
            chapter_id: chapter_id.into(),
            section_id: section_id.into(),
        }
    }

    /// Deterministic key used by the mastery store.
    pub fn mastery_key(&self) -> String {
        format!("{}-{}", self.chapter_id, self.section_id)
    }
}

impl fmt::Display for SectionAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.chapter_id, self.section_id)
    }
}
