//! Rendering dispatcher: turns content nodes plus widget state into a flat
//! list of presentable blocks.
//!
//! Rendering is total. Every node yields output: diagnostic nodes and nodes
//! whose widget data cannot be used yield a `Block::Placeholder` instead of an
//! error, so one broken node never hides its siblings. Interactions, by
//! contrast, are fallible and return `ContentShapeError` when addressed to the
//! wrong node or a nonexistent item.

use std::collections::HashMap;

use crate::error::ContentShapeError;
use crate::model::{ContentNode, FeedbackTone, NodeBody};
use crate::widgets::{
    score_password, strength_label, FlashcardState, Judgement, PasswordState, PhishingState,
    ScenarioState, Verdict, WidgetState, WifiState,
};

/// Everything produced for one content node.
#[derive(Debug, Clone)]
pub struct RenderedOutput {
    pub blocks: Vec<Block>,
}

/// One presentable unit. Composite kinds (exercises, explainers, checklists)
/// flatten into several simple blocks rather than growing their own variants.
#[derive(Debug, Clone)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
    },
    /// A formula of the shape "lhs = rhs", presented as a two-sided analogy.
    Analogy {
        lhs: String,
        rhs: String,
    },
    List {
        ordered: bool,
        items: Vec<String>,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        caption: Option<String>,
    },
    /// Charts are summarized; actual plotting belongs to a frontend layer.
    Chart {
        title: Option<String>,
        summary: String,
    },
    Diagram {
        definition: String,
    },
    Callout {
        tone: CalloutTone,
        label: String,
        text: String,
    },
    Flashcards(FlashcardsView),
    Scenario(ScenarioView),
    Phishing(PhishingView),
    PasswordMeter(PasswordMeterView),
    WifiPicker(WifiPickerView),
    /// Stands in for a node that could not be rendered.
    Placeholder {
        kind: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalloutTone {
    Tip,
    Caution,
}

// ---------------------------------------------------------------------------
// Widget views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FlashcardsView {
    pub title: String,
    pub cards: Vec<CardView>,
}

#[derive(Debug, Clone)]
pub struct CardView {
    pub id: String,
    /// The face currently shown: term when unflipped, definition when flipped.
    pub shown: String,
    pub flipped: bool,
}

#[derive(Debug, Clone)]
pub struct ScenarioView {
    pub title: String,
    pub description: String,
    pub choices: Vec<ChoiceView>,
    pub locked: bool,
    pub completed: bool,
    /// Present only once the scenario is completed.
    pub success_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChoiceView {
    pub id: String,
    pub text: String,
    pub selected: bool,
    /// Feedback is revealed only for the selected choice.
    pub feedback: Option<String>,
    pub feedback_tone: Option<FeedbackTone>,
}

#[derive(Debug, Clone)]
pub struct PhishingView {
    pub title: String,
    pub introduction: String,
    pub emails: Vec<EmailView>,
    pub complete: bool,
    pub completion_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmailView {
    pub id: String,
    pub sender: String,
    pub subject: String,
    pub body_preview: String,
    pub judged: Option<EmailOutcome>,
}

#[derive(Debug, Clone)]
pub struct EmailOutcome {
    pub correct: bool,
    pub feedback: String,
    /// Clues are revealed only after judging.
    pub clues: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PasswordMeterView {
    pub title: String,
    pub disclaimer: Option<String>,
    pub score: u8,
    pub strength: &'static str,
    /// Per-criterion tip and whether the current input satisfies it.
    pub criteria: Vec<(String, bool)>,
}

#[derive(Debug, Clone)]
pub struct WifiPickerView {
    pub title: String,
    pub scenario_description: String,
    pub networks: Vec<NetworkView>,
    /// Revealed once a recommended network has been selected.
    pub general_advice: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NetworkView {
    pub id: String,
    pub ssid: String,
    pub security: String,
    pub signal_strength: Option<u8>,
    pub selected: bool,
    pub feedback: Option<String>,
    pub recommended: bool,
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Owns the widget state for the currently displayed sequence of nodes,
/// keyed by node index. A section change must go through `reset`.
#[derive(Debug, Default)]
pub struct Renderer {
    states: HashMap<usize, WidgetState>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all widget state. Called on every section change.
    pub fn reset(&mut self) {
        self.states.clear();
    }

    pub fn render_section(&mut self, nodes: &[ContentNode]) -> Vec<RenderedOutput> {
        nodes
            .iter()
            .enumerate()
            .map(|(index, node)| self.render(index, node))
            .collect()
    }

    /// Render one node. Total: never fails, never panics.
    pub fn render(&mut self, index: usize, node: &ContentNode) -> RenderedOutput {
        let blocks = match &node.body {
            NodeBody::Heading { level, text } => vec![Block::Heading {
                level: *level,
                text: text.clone(),
            }],
            NodeBody::H3 { text } => vec![Block::Heading {
                level: 3,
                text: text.clone(),
            }],
            NodeBody::H4 { text } => vec![Block::Heading {
                level: 4,
                text: text.clone(),
            }],
            NodeBody::Paragraph { text } => vec![Block::Paragraph { text: text.clone() }],
            NodeBody::List { items } => vec![Block::List {
                ordered: false,
                items: items.clone(),
            }],
            NodeBody::Table(data) => vec![Block::Table {
                headers: data.headers.clone(),
                rows: data.rows.clone(),
                caption: data.caption.clone(),
            }],
            NodeBody::Formula { formula } => vec![render_formula(formula)],
            NodeBody::Chart(data) => {
                let summary = format!(
                    "{:?} chart with {} series over {} labels",
                    data.chart_type,
                    data.datasets.len(),
                    data.labels.len()
                );
                vec![Block::Chart {
                    title: data.title.clone(),
                    summary,
                }]
            }
            NodeBody::Diagram { definition } => vec![Block::Diagram {
                definition: definition.clone(),
            }],
            NodeBody::CautionaryTale(data) => vec![Block::Callout {
                tone: CalloutTone::Caution,
                label: data.source.clone().unwrap_or_else(|| "Cautionary tale".into()),
                text: data.text.clone(),
            }],
            NodeBody::MicroTip { tip } => vec![Block::Callout {
                tone: CalloutTone::Tip,
                label: "Tip".into(),
                text: tip.clone(),
            }],
            NodeBody::PracticalExercise(data) => {
                let mut blocks = vec![
                    Block::Heading {
                        level: 3,
                        text: data.title.clone(),
                    },
                    Block::Paragraph {
                        text: data.introduction.clone(),
                    },
                    Block::List {
                        ordered: true,
                        items: data
                            .tasks
                            .iter()
                            .map(|t| match &t.details {
                                Some(details) => format!("{} ({details})", t.description),
                                None => t.description.clone(),
                            })
                            .collect(),
                    },
                    Block::Paragraph {
                        text: format!("Expected outcome: {}", data.expected_outcome),
                    },
                ];
                if let Some(notes) = &data.notes {
                    blocks.push(Block::Callout {
                        tone: CalloutTone::Tip,
                        label: "Note".into(),
                        text: notes.clone(),
                    });
                }
                blocks
            }
            NodeBody::InteractiveConcept(data) => {
                let mut blocks = vec![Block::Heading {
                    level: 3,
                    text: data.title.clone(),
                }];
                if let Some(intro) = &data.introduction {
                    blocks.push(Block::Paragraph { text: intro.clone() });
                }
                for concept in &data.concepts {
                    blocks.push(Block::Paragraph {
                        text: format!("{}: {}", concept.term, concept.brief),
                    });
                    if !concept.details.is_empty() {
                        blocks.push(Block::List {
                            ordered: false,
                            items: concept
                                .details
                                .iter()
                                .map(|d| match &d.example {
                                    Some(example) => {
                                        format!("{}: {} (e.g. {example})", d.title, d.explanation)
                                    }
                                    None => format!("{}: {}", d.title, d.explanation),
                                })
                                .collect(),
                        });
                    }
                }
                blocks
            }
            NodeBody::ThreatExplainer(data) => vec![
                Block::Heading {
                    level: 3,
                    text: data.title.clone(),
                },
                Block::Paragraph {
                    text: data.introduction.clone(),
                },
                Block::List {
                    ordered: true,
                    items: data
                        .steps
                        .iter()
                        .map(|s| format!("{}: {}", s.title, s.description))
                        .collect(),
                },
            ],
            NodeBody::Checklist(data) => vec![
                Block::Heading {
                    level: 3,
                    text: data.title.clone(),
                },
                Block::List {
                    ordered: false,
                    items: data
                        .items
                        .iter()
                        .map(|i| match (&i.guide_link, &i.guide_link_text) {
                            (Some(link), Some(label)) => format!("{} ({label}: {link})", i.text),
                            (Some(link), None) => format!("{} ({link})", i.text),
                            _ => i.text.clone(),
                        })
                        .collect(),
                },
            ],
            NodeBody::EndOfChapterActions(data) => vec![
                Block::Heading {
                    level: 3,
                    text: data.title.clone(),
                },
                Block::List {
                    ordered: false,
                    items: data
                        .actions
                        .iter()
                        .map(|a| match (&a.link, &a.link_text) {
                            (Some(link), Some(label)) => format!("{} ({label}: {link})", a.text),
                            (Some(link), None) => format!("{} ({link})", a.text),
                            _ => a.text.clone(),
                        })
                        .collect(),
                },
            ],
            NodeBody::FlashcardSet(data) => {
                let state = self.flashcards_at(index);
                let cards = data
                    .cards
                    .iter()
                    .map(|card| {
                        let flipped = state.is_flipped(&card.id);
                        CardView {
                            id: card.id.clone(),
                            shown: if flipped {
                                card.definition.clone()
                            } else {
                                card.term.clone()
                            },
                            flipped,
                        }
                    })
                    .collect();
                vec![Block::Flashcards(FlashcardsView {
                    title: data.title.clone(),
                    cards,
                })]
            }
            NodeBody::InteractiveScenario(data) => {
                let state = self.scenario_at(index).clone();
                let choices = data
                    .choices
                    .iter()
                    .map(|choice| {
                        let selected = state.selected() == Some(choice.id.as_str());
                        ChoiceView {
                            id: choice.id.clone(),
                            text: choice.text.clone(),
                            selected,
                            feedback: selected.then(|| choice.feedback.clone()),
                            feedback_tone: if selected { choice.feedback_tone } else { None },
                        }
                    })
                    .collect();
                vec![Block::Scenario(ScenarioView {
                    title: data.title.clone(),
                    description: data.description.clone(),
                    choices,
                    locked: state.is_locked(),
                    completed: state.is_completed(),
                    success_message: state
                        .is_completed()
                        .then(|| data.success_message.clone()),
                })]
            }
            NodeBody::PhishingSimulator(data) => {
                let state = self.phishing_at(index).clone();
                let emails = data
                    .emails
                    .iter()
                    .map(|email| EmailView {
                        id: email.id.clone(),
                        sender: email.sender.clone(),
                        subject: email.subject.clone(),
                        body_preview: email.body_preview.clone(),
                        judged: state.judgement(&email.id).map(|j| EmailOutcome {
                            correct: j.correct,
                            feedback: if j.correct {
                                email.feedback_correct.clone()
                            } else {
                                email.feedback_incorrect.clone()
                            },
                            clues: email.clues.clone(),
                        }),
                    })
                    .collect();
                let complete = state.is_complete(data);
                vec![Block::Phishing(PhishingView {
                    title: data.title.clone(),
                    introduction: data.introduction.clone(),
                    emails,
                    complete,
                    completion_message: complete.then(|| data.completion_message.clone()),
                })]
            }
            NodeBody::PasswordChecker(data) => {
                let input = self.password_at(index).input.clone();
                match score_password(&input, &data.criteria) {
                    Ok(score) => vec![Block::PasswordMeter(PasswordMeterView {
                        title: data.title.clone(),
                        disclaimer: data.disclaimer.clone(),
                        score: score.value,
                        strength: strength_label(score.value),
                        criteria: data
                            .criteria
                            .iter()
                            .map(|c| {
                                let met = score.satisfied.get(&c.id).copied().unwrap_or(false);
                                (c.message.clone(), met)
                            })
                            .collect(),
                    })],
                    Err(e) => vec![placeholder(&node.kind, &e.to_string())],
                }
            }
            NodeBody::WifiSimulator(data) => {
                let state = self.wifi_at(index).clone();
                let picked_recommended = state.selected().is_some_and(|id| {
                    data.networks
                        .iter()
                        .any(|n| n.id == id && n.is_recommended)
                });
                let networks = data
                    .networks
                    .iter()
                    .map(|network| {
                        let selected = state.selected() == Some(network.id.as_str());
                        NetworkView {
                            id: network.id.clone(),
                            ssid: network.ssid.clone(),
                            security: network.security.clone(),
                            signal_strength: network.signal_strength,
                            selected,
                            feedback: selected.then(|| network.feedback.clone()),
                            recommended: network.is_recommended,
                        }
                    })
                    .collect();
                vec![Block::WifiPicker(WifiPickerView {
                    title: data.title.clone(),
                    scenario_description: data.scenario_description.clone(),
                    networks,
                    general_advice: if picked_recommended {
                        data.general_advice.clone()
                    } else {
                        None
                    },
                })]
            }
            NodeBody::Unsupported => vec![placeholder(
                &node.kind,
                "this content kind is not supported",
            )],
            NodeBody::Malformed { reason } => {
                let error = ContentShapeError::MissingPayload {
                    kind: node.kind.clone(),
                    reason: reason.clone(),
                };
                vec![placeholder(&node.kind, &error.to_string())]
            }
        };
        RenderedOutput { blocks }
    }

    // -- interactions -------------------------------------------------------

    pub fn flip_card(
        &mut self,
        index: usize,
        node: &ContentNode,
        card_id: &str,
    ) -> Result<(), ContentShapeError> {
        let NodeBody::FlashcardSet(data) = &node.body else {
            return Err(wrong_kind("flashcard-set", node));
        };
        if !data.cards.iter().any(|c| c.id == card_id) {
            return Err(ContentShapeError::UnknownItem {
                kind: "flashcard-set".into(),
                item_id: card_id.to_string(),
            });
        }
        self.flashcards_at(index).toggle(card_id);
        Ok(())
    }

    pub fn choose(
        &mut self,
        index: usize,
        node: &ContentNode,
        choice_id: &str,
    ) -> Result<(), ContentShapeError> {
        let NodeBody::InteractiveScenario(data) = &node.body else {
            return Err(wrong_kind("interactive-scenario", node));
        };
        self.scenario_at(index).choose(data, choice_id)
    }

    pub fn reset_scenario(
        &mut self,
        index: usize,
        node: &ContentNode,
    ) -> Result<(), ContentShapeError> {
        if !matches!(node.body, NodeBody::InteractiveScenario(_)) {
            return Err(wrong_kind("interactive-scenario", node));
        }
        self.scenario_at(index).reset();
        Ok(())
    }

    pub fn judge_email(
        &mut self,
        index: usize,
        node: &ContentNode,
        email_id: &str,
        verdict: Verdict,
    ) -> Result<Judgement, ContentShapeError> {
        let NodeBody::PhishingSimulator(data) = &node.body else {
            return Err(wrong_kind("phishing-simulator", node));
        };
        self.phishing_at(index).judge(data, email_id, verdict)
    }

    pub fn set_password_input(
        &mut self,
        index: usize,
        node: &ContentNode,
        input: &str,
    ) -> Result<(), ContentShapeError> {
        if !matches!(node.body, NodeBody::PasswordChecker(_)) {
            return Err(wrong_kind("password-checker", node));
        }
        self.password_at(index).input = input.to_string();
        Ok(())
    }

    pub fn pick_network(
        &mut self,
        index: usize,
        node: &ContentNode,
        network_id: &str,
    ) -> Result<(), ContentShapeError> {
        let NodeBody::WifiSimulator(data) = &node.body else {
            return Err(wrong_kind("wifi-simulator", node));
        };
        self.wifi_at(index).select(data, network_id)
    }

    pub fn dismiss_network(
        &mut self,
        index: usize,
        node: &ContentNode,
    ) -> Result<(), ContentShapeError> {
        if !matches!(node.body, NodeBody::WifiSimulator(_)) {
            return Err(wrong_kind("wifi-simulator", node));
        }
        self.wifi_at(index).dismiss();
        Ok(())
    }

    // -- state slots --------------------------------------------------------
    //
    // A slot holding state of the wrong family means the node sequence changed
    // under us without a reset; the stale state is replaced.

    fn flashcards_at(&mut self, index: usize) -> &mut FlashcardState {
        let slot = self
            .states
            .entry(index)
            .or_insert_with(|| WidgetState::Flashcards(FlashcardState::default()));
        if !matches!(slot, WidgetState::Flashcards(_)) {
            *slot = WidgetState::Flashcards(FlashcardState::default());
        }
        match slot {
            WidgetState::Flashcards(state) => state,
            _ => unreachable!(),
        }
    }

    fn scenario_at(&mut self, index: usize) -> &mut ScenarioState {
        let slot = self
            .states
            .entry(index)
            .or_insert_with(|| WidgetState::Scenario(ScenarioState::default()));
        if !matches!(slot, WidgetState::Scenario(_)) {
            *slot = WidgetState::Scenario(ScenarioState::default());
        }
        match slot {
            WidgetState::Scenario(state) => state,
            _ => unreachable!(),
        }
    }

    fn phishing_at(&mut self, index: usize) -> &mut PhishingState {
        let slot = self
            .states
            .entry(index)
            .or_insert_with(|| WidgetState::Phishing(PhishingState::default()));
        if !matches!(slot, WidgetState::Phishing(_)) {
            *slot = WidgetState::Phishing(PhishingState::default());
        }
        match slot {
            WidgetState::Phishing(state) => state,
            _ => unreachable!(),
        }
    }

    fn password_at(&mut self, index: usize) -> &mut PasswordState {
        let slot = self
            .states
            .entry(index)
            .or_insert_with(|| WidgetState::Password(PasswordState::default()));
        if !matches!(slot, WidgetState::Password(_)) {
            *slot = WidgetState::Password(PasswordState::default());
        }
        match slot {
            WidgetState::Password(state) => state,
            _ => unreachable!(),
        }
    }

    fn wifi_at(&mut self, index: usize) -> &mut WifiState {
        let slot = self
            .states
            .entry(index)
            .or_insert_with(|| WidgetState::Wifi(WifiState::default()));
        if !matches!(slot, WidgetState::Wifi(_)) {
            *slot = WidgetState::Wifi(WifiState::default());
        }
        match slot {
            WidgetState::Wifi(state) => state,
            _ => unreachable!(),
        }
    }
}

fn render_formula(formula: &str) -> Block {
    let parts: Vec<&str> = formula.split(" = ").collect();
    match parts.as_slice() {
        [lhs, rhs] if !lhs.is_empty() && !rhs.is_empty() => Block::Analogy {
            lhs: lhs.to_string(),
            rhs: rhs.to_string(),
        },
        _ => Block::Paragraph {
            text: formula.to_string(),
        },
    }
}

fn placeholder(kind: &str, reason: &str) -> Block {
    Block::Placeholder {
        kind: kind.to_string(),
        reason: reason.to_string(),
    }
}

fn wrong_kind(expected: &str, node: &ContentNode) -> ContentShapeError {
    ContentShapeError::WrongKind {
        expected: expected.to_string(),
        found: node.kind.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(json: &str) -> ContentNode {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn renders_every_node_in_a_mixed_section() {
        let section: Vec<ContentNode> = serde_json::from_str(
            r#"[
                {"kind": "heading", "text": "Intro", "level": 2},
                {"kind": "mystery"},
                {"kind": "table"},
                {"kind": "paragraph", "text": "after the broken ones"}
            ]"#,
        )
        .unwrap();

        let mut renderer = Renderer::new();
        let outputs = renderer.render_section(&section);
        assert_eq!(outputs.len(), 4);
        assert!(matches!(outputs[0].blocks[0], Block::Heading { level: 2, .. }));
        assert!(matches!(outputs[1].blocks[0], Block::Placeholder { .. }));
        assert!(matches!(outputs[2].blocks[0], Block::Placeholder { .. }));
        assert!(matches!(outputs[3].blocks[0], Block::Paragraph { .. }));
    }

    #[test]
    fn malformed_placeholder_names_the_kind() {
        let mut renderer = Renderer::new();
        let output = renderer.render(0, &node(r#"{"kind": "chart"}"#));
        let Block::Placeholder { kind, reason } = &output.blocks[0] else {
            panic!("expected a placeholder");
        };
        assert_eq!(kind, "chart");
        assert!(reason.contains("missing data for kind chart"));
    }

    #[test]
    fn formula_with_two_sides_becomes_analogy() {
        let mut renderer = Renderer::new();
        let output = renderer.render(0, &node(r#"{"kind": "formula", "formula": "Password = House key"}"#));
        let Block::Analogy { lhs, rhs } = &output.blocks[0] else {
            panic!("expected an analogy");
        };
        assert_eq!(lhs, "Password");
        assert_eq!(rhs, "House key");

        // Anything else stays a plain paragraph.
        let output = renderer.render(1, &node(r#"{"kind": "formula", "formula": "a = b = c"}"#));
        assert!(matches!(output.blocks[0], Block::Paragraph { .. }));
    }

    #[test]
    fn flashcard_flip_swaps_the_shown_face() {
        let card_node = node(
            r#"{"kind": "flashcard-set", "title": "Terms", "cards": [
                {"id": "c1", "term": "VPN", "definition": "An encrypted tunnel"}
            ]}"#,
        );
        let mut renderer = Renderer::new();

        let output = renderer.render(0, &card_node);
        let Block::Flashcards(view) = &output.blocks[0] else {
            panic!("expected flashcards");
        };
        assert_eq!(view.cards[0].shown, "VPN");

        renderer.flip_card(0, &card_node, "c1").unwrap();
        let output = renderer.render(0, &card_node);
        let Block::Flashcards(view) = &output.blocks[0] else {
            panic!("expected flashcards");
        };
        assert_eq!(view.cards[0].shown, "An encrypted tunnel");
        assert!(view.cards[0].flipped);
    }

    #[test]
    fn scenario_feedback_is_revealed_only_for_the_selected_choice() {
        let scenario_node = node(
            r#"{"kind": "interactive-scenario", "title": "Link", "description": "d",
                "choices": [
                    {"id": "a", "text": "Click", "feedback": "Bad idea"},
                    {"id": "b", "text": "Verify", "feedback": "Good", "is_correct": true}
                ],
                "success_message": "Nice"}"#,
        );
        let mut renderer = Renderer::new();
        renderer.choose(0, &scenario_node, "b").unwrap();

        let output = renderer.render(0, &scenario_node);
        let Block::Scenario(view) = &output.blocks[0] else {
            panic!("expected scenario");
        };
        assert!(view.completed);
        assert_eq!(view.success_message.as_deref(), Some("Nice"));
        assert!(view.choices[0].feedback.is_none());
        assert_eq!(view.choices[1].feedback.as_deref(), Some("Good"));
    }

    #[test]
    fn password_meter_reflects_current_input() {
        let checker_node = node(
            r#"{"kind": "password-checker", "title": "Try one", "criteria": [
                {"id": "digit", "pattern": "[0-9]", "message": "Add a number", "weight": 50}
            ]}"#,
        );
        let mut renderer = Renderer::new();
        renderer
            .set_password_input(0, &checker_node, "password1234")
            .unwrap();

        let output = renderer.render(0, &checker_node);
        let Block::PasswordMeter(view) = &output.blocks[0] else {
            panic!("expected a password meter");
        };
        assert_eq!(view.score, 60);
        assert_eq!(view.strength, "Medium");
        assert_eq!(view.criteria[0], ("Add a number".into(), true));
    }

    #[test]
    fn wifi_advice_only_after_recommended_pick() {
        let wifi_node = node(
            r#"{"kind": "wifi-simulator", "title": "Pick", "scenario_description": "d",
                "networks": [
                    {"id": "open", "ssid": "FREE", "security": "Open", "feedback": "Risky"},
                    {"id": "wpa3", "ssid": "Home", "security": "WPA3", "is_recommended": true, "feedback": "Safe"}
                ],
                "general_advice": "Prefer WPA3."}"#,
        );
        let mut renderer = Renderer::new();

        renderer.pick_network(0, &wifi_node, "open").unwrap();
        let output = renderer.render(0, &wifi_node);
        let Block::WifiPicker(view) = &output.blocks[0] else {
            panic!("expected a wifi picker");
        };
        assert!(view.general_advice.is_none());
        assert_eq!(view.networks[0].feedback.as_deref(), Some("Risky"));

        renderer.dismiss_network(0, &wifi_node).unwrap();
        renderer.pick_network(0, &wifi_node, "wpa3").unwrap();
        let output = renderer.render(0, &wifi_node);
        let Block::WifiPicker(view) = &output.blocks[0] else {
            panic!("expected a wifi picker");
        };
        assert_eq!(view.general_advice.as_deref(), Some("Prefer WPA3."));
    }

    #[test]
    fn interaction_on_wrong_kind_is_an_error() {
        let paragraph = node(r#"{"kind": "paragraph", "text": "x"}"#);
        let mut renderer = Renderer::new();
        let err = renderer.flip_card(0, &paragraph, "c1").unwrap_err();
        assert!(matches!(err, ContentShapeError::WrongKind { .. }));
    }

    #[test]
    fn reset_discards_widget_state() {
        let card_node = node(
            r#"{"kind": "flashcard-set", "title": "Terms", "cards": [
                {"id": "c1", "term": "VPN", "definition": "Tunnel"}
            ]}"#,
        );
        let mut renderer = Renderer::new();
        renderer.flip_card(0, &card_node, "c1").unwrap();
        renderer.reset();

        let output = renderer.render(0, &card_node);
        let Block::Flashcards(view) = &output.blocks[0] else {
            panic!("expected flashcards");
        };
        assert!(!view.cards[0].flipped);
    }
}
