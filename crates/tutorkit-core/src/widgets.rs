//! Interaction state machines for the widget content kinds.
//!
//! Each machine is independent and keyed by item ids local to its node. The
//! rendering dispatcher owns one state per widget node; a section change
//! discards all of them. Every update is fallible rather than panicking, so
//! the dispatcher can convert a bad update into a placeholder for that node
//! without touching its siblings.

use std::collections::{BTreeMap, HashSet};

use regex::Regex;

use crate::error::ContentShapeError;
use crate::model::{
    InteractiveScenarioData, PasswordCriterion, PhishingSimulatorData, WifiSimulatorData,
};

// ---------------------------------------------------------------------------
// Flashcards
// ---------------------------------------------------------------------------

/// Per-card flip flags. Cards toggle independently; there are no cross-card
/// effects.
#[derive(Debug, Clone, Default)]
pub struct FlashcardState {
    flipped: HashSet<String>,
}

impl FlashcardState {
    pub fn toggle(&mut self, card_id: &str) {
        if !self.flipped.remove(card_id) {
            self.flipped.insert(card_id.to_string());
        }
    }

    pub fn is_flipped(&self, card_id: &str) -> bool {
        self.flipped.contains(card_id)
    }
}

// ---------------------------------------------------------------------------
// Interactive scenario
// ---------------------------------------------------------------------------

/// Single-selection scenario: the first choice locks all choices; the state
/// turns terminal only when the selected choice is flagged correct; reset
/// returns to the initial state.
#[derive(Debug, Clone, Default)]
pub struct ScenarioState {
    selected: Option<String>,
    completed: bool,
}

impl ScenarioState {
    /// Select a choice. A no-op once any choice has been made.
    pub fn choose(
        &mut self,
        data: &InteractiveScenarioData,
        choice_id: &str,
    ) -> Result<(), ContentShapeError> {
        if self.selected.is_some() {
            return Ok(());
        }
        let choice = data
            .choices
            .iter()
            .find(|c| c.id == choice_id)
            .ok_or_else(|| ContentShapeError::UnknownItem {
                kind: "interactive-scenario".into(),
                item_id: choice_id.to_string(),
            })?;
        self.selected = Some(choice.id.clone());
        if choice.is_correct {
            self.completed = true;
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.selected = None;
        self.completed = false;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_locked(&self) -> bool {
        self.selected.is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

// ---------------------------------------------------------------------------
// Phishing triage
// ---------------------------------------------------------------------------

/// A learner's verdict on one email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    Phish,
}

/// The recorded outcome of judging one email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Judgement {
    pub verdict: Verdict,
    pub correct: bool,
}

/// Append-only verdict log keyed by email id. A verdict is immutable once
/// set; re-judging an already judged email is a no-op.
#[derive(Debug, Clone, Default)]
pub struct PhishingState {
    judgements: BTreeMap<String, Judgement>,
}

impl PhishingState {
    /// Record a verdict for an email. Returns the judgement now on record,
    /// which is the pre-existing one if the email was already judged.
    pub fn judge(
        &mut self,
        data: &PhishingSimulatorData,
        email_id: &str,
        verdict: Verdict,
    ) -> Result<Judgement, ContentShapeError> {
        let email = data
            .emails
            .iter()
            .find(|e| e.id == email_id)
            .ok_or_else(|| ContentShapeError::UnknownItem {
                kind: "phishing-simulator".into(),
                item_id: email_id.to_string(),
            })?;

        if let Some(existing) = self.judgements.get(email_id) {
            return Ok(*existing);
        }

        let correct = match verdict {
            Verdict::Phish => email.is_phishing,
            Verdict::Safe => !email.is_phishing,
        };
        let judgement = Judgement { verdict, correct };
        self.judgements.insert(email_id.to_string(), judgement);
        Ok(judgement)
    }

    pub fn judgement(&self, email_id: &str) -> Option<Judgement> {
        self.judgements.get(email_id).copied()
    }

    /// Completed when every truly-phishing email has been correctly flagged,
    /// or when every email has received a verdict, whichever comes first.
    pub fn is_complete(&self, data: &PhishingSimulatorData) -> bool {
        let all_phish_flagged = data
            .emails
            .iter()
            .filter(|e| e.is_phishing)
            .all(|e| self.judgements.get(&e.id).is_some_and(|j| j.correct));
        let all_assessed = data
            .emails
            .iter()
            .all(|e| self.judgements.contains_key(&e.id));
        all_phish_flagged || all_assessed
    }
}

// ---------------------------------------------------------------------------
// Password strength
// ---------------------------------------------------------------------------

/// Current sample input for the password meter. No history is kept beyond the
/// input itself; the score is recomputed from scratch on every change.
#[derive(Debug, Clone, Default)]
pub struct PasswordState {
    pub input: String,
}

/// Result of scoring one password input against a criteria set.
#[derive(Debug, Clone)]
pub struct PasswordScore {
    /// Clamped to 0..=100.
    pub value: u8,
    /// Per-criterion satisfaction, keyed by criterion id.
    pub satisfied: BTreeMap<String, bool>,
}

/// Score a sample password against weighted regex criteria.
///
/// Matched criteria add their weight; inputs under 8 characters take a 20
/// point penalty (floored at zero) and inputs of 12 or more gain a 10 point
/// bonus; the empty input always scores zero. The final value is clamped to
/// 0..=100.
pub fn score_password(
    input: &str,
    criteria: &[PasswordCriterion],
) -> Result<PasswordScore, ContentShapeError> {
    let mut raw: i32 = 0;
    let mut satisfied = BTreeMap::new();

    for criterion in criteria {
        let regex =
            Regex::new(&criterion.pattern).map_err(|e| ContentShapeError::InvalidPattern {
                criterion_id: criterion.id.clone(),
                reason: e.to_string(),
            })?;
        let met = regex.is_match(input);
        if met {
            raw += criterion.weight;
        }
        satisfied.insert(criterion.id.clone(), met);
    }

    let length = input.chars().count();
    if length == 0 {
        raw = 0;
    } else if length < 8 {
        raw = (raw - 20).max(0);
    } else if length >= 12 {
        raw += 10;
    }

    Ok(PasswordScore {
        value: raw.clamp(0, 100) as u8,
        satisfied,
    })
}

/// Human-readable strength band for a 0-100 score.
pub fn strength_label(value: u8) -> &'static str {
    match value {
        0..=24 => "Very Weak",
        25..=49 => "Weak",
        50..=74 => "Medium",
        75..=89 => "Strong",
        _ => "Very Strong",
    }
}

// ---------------------------------------------------------------------------
// Wi-Fi choice
// ---------------------------------------------------------------------------

/// Single-selection per attempt with feedback shown while selected; the
/// selection can be dismissed to try again. Nothing persists across attempts.
#[derive(Debug, Clone, Default)]
pub struct WifiState {
    selected: Option<String>,
}

impl WifiState {
    pub fn select(
        &mut self,
        data: &WifiSimulatorData,
        network_id: &str,
    ) -> Result<(), ContentShapeError> {
        if !data.networks.iter().any(|n| n.id == network_id) {
            return Err(ContentShapeError::UnknownItem {
                kind: "wifi-simulator".into(),
                item_id: network_id.to_string(),
            });
        }
        self.selected = Some(network_id.to_string());
        Ok(())
    }

    pub fn dismiss(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Dispatcher-facing wrapper
// ---------------------------------------------------------------------------

/// The widget state attached to one node, tagged by widget family so the
/// dispatcher can detect a state/kind mismatch instead of panicking.
#[derive(Debug, Clone)]
pub enum WidgetState {
    Flashcards(FlashcardState),
    Scenario(ScenarioState),
    Phishing(PhishingState),
    Password(PasswordState),
    Wifi(WifiState),
}
