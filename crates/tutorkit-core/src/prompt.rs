//! Prompt construction for the study-aid pipeline and the scoped chat.
//!
//! All prompts are grounded in a single section: the section's textual
//! content is flattened in document order and embedded in the prompt, so the
//! provider never sees more than the learner is currently looking at.

use crate::artifact::ArtifactKind;
use crate::model::{NodeBody, Section};

/// Character budget for the chat context excerpt.
pub const CHAT_CONTEXT_BUDGET: usize = 1000;

/// Flatten a section's textual content into one plain-text document, in node
/// order. Interactive payloads contribute their descriptive text only;
/// diagnostic nodes contribute nothing.
pub fn flatten_section(section: &Section) -> String {
    let mut lines: Vec<String> = Vec::new();
    for node in &section.content {
        match &node.body {
            NodeBody::Heading { text, .. }
            | NodeBody::H3 { text }
            | NodeBody::H4 { text } => lines.push(text.clone()),
            NodeBody::Paragraph { text } => lines.push(text.clone()),
            NodeBody::List { items } => lines.extend(items.iter().cloned()),
            NodeBody::Table(data) => {
                if let Some(caption) = &data.caption {
                    lines.push(format!("Table: {caption}"));
                }
            }
            NodeBody::Formula { formula } => lines.push(formula.clone()),
            NodeBody::CautionaryTale(data) => lines.push(data.text.clone()),
            NodeBody::MicroTip { tip } => lines.push(tip.clone()),
            NodeBody::PracticalExercise(data) => {
                lines.push(format!("Practical Exercise: {}", data.title));
                lines.push(data.introduction.clone());
                lines.extend(data.tasks.iter().map(|t| t.description.clone()));
                lines.push(data.expected_outcome.clone());
            }
            NodeBody::InteractiveScenario(data) => {
                lines.push(format!("Scenario: {}", data.title));
                lines.push(data.description.clone());
            }
            NodeBody::PhishingSimulator(data) => {
                lines.push(format!("Exercise: {}", data.title));
                lines.push(data.introduction.clone());
            }
            NodeBody::PasswordChecker(data) => lines.push(format!("Exercise: {}", data.title)),
            NodeBody::WifiSimulator(data) => {
                lines.push(format!("Exercise: {}", data.title));
                lines.push(data.scenario_description.clone());
            }
            NodeBody::InteractiveConcept(data) => {
                lines.push(data.title.clone());
                for concept in &data.concepts {
                    lines.push(format!("{}: {}", concept.term, concept.brief));
                }
            }
            NodeBody::ThreatExplainer(data) => {
                lines.push(data.title.clone());
                lines.push(data.introduction.clone());
                lines.extend(
                    data.steps
                        .iter()
                        .map(|s| format!("{}: {}", s.title, s.description)),
                );
            }
            NodeBody::Checklist(data) => {
                lines.push(data.title.clone());
                lines.extend(data.items.iter().map(|i| i.text.clone()));
            }
            NodeBody::EndOfChapterActions(data) => {
                lines.push(data.title.clone());
                lines.extend(data.actions.iter().map(|a| a.text.clone()));
            }
            NodeBody::FlashcardSet(data) => {
                lines.push(data.title.clone());
                lines.extend(
                    data.cards
                        .iter()
                        .map(|c| format!("{}: {}", c.term, c.definition)),
                );
            }
            NodeBody::Chart(_)
            | NodeBody::Diagram { .. }
            | NodeBody::Unsupported
            | NodeBody::Malformed { .. } => {}
        }
    }
    lines.join("\n")
}

/// Build the generation prompt for one artifact kind, grounded in a section.
pub fn artifact_prompt(kind: ArtifactKind, chapter_title: &str, section: &Section) -> String {
    let instruction = match kind {
        ArtifactKind::Takeaways => {
            "Generate 3 to 5 key takeaways. Respond with a JSON object with a single key \
             \"key_takeaways\" holding an array of strings."
        }
        ArtifactKind::ReviewQuestions => {
            "Generate 2 to 3 review questions to check the reader's understanding. Respond with a \
             JSON object with a single key \"review_questions\" holding an array of objects, each \
             with \"question\" (string), optional \"options\" (array of strings for multiple \
             choice), \"answer\" (string), and optional \"explanation\" (string)."
        }
        ArtifactKind::Scenario => {
            "Generate one short practical scenario that applies this material to everyday life. \
             Respond with a JSON object with a single key \"practical_scenario\" holding an object \
             with \"description\" (string) and optional \"guidance\" (string)."
        }
        ArtifactKind::FurtherStudy => {
            "Recommend 2 to 4 resources for further study of this topic. Respond with a JSON \
             object with a single key \"further_study_recommendations\" holding an array of \
             objects, each with \"title\" (string), optional \"link\" (string), and \
             \"description\" (string)."
        }
    };
    format!(
        "Based on the following section content titled \"{}\" from chapter \"{}\":\n\n{}\n\n{}",
        section.title,
        chapter_title,
        flatten_section(section),
        instruction
    )
}

/// Build the chat prompt: the learner's question plus a bounded excerpt of
/// the active section for context.
pub fn chat_prompt(chapter_title: &str, section: &Section, question: &str) -> String {
    let flattened = flatten_section(section);
    let excerpt = truncate_chars(&flattened, CHAT_CONTEXT_BUDGET);
    let ellipsis = if excerpt.len() < flattened.len() { "..." } else { "" };
    format!(
        "Context: Section \"{}\" from chapter \"{}\". Content summary: \"\"\"{excerpt}{ellipsis}\"\"\" Question: \"{question}\"",
        section.title, chapter_title
    )
}

/// Truncate to at most `max` characters, never splitting a character.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((pos, _)) => &s[..pos],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Section;

    fn section(json: &str) -> Section {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn flatten_preserves_node_order() {
        let section = section(
            r#"{
                "id": "1.1", "title": "Basics",
                "content": [
                    {"kind": "heading", "text": "Why passwords matter"},
                    {"kind": "paragraph", "text": "They guard everything."},
                    {"kind": "list", "items": ["length", "uniqueness"]},
                    {"kind": "table", "headers": ["a"], "rows": [["b"]], "caption": "Examples"},
                    {"kind": "mystery-widget"}
                ]
            }"#,
        );
        let flat = flatten_section(&section);
        assert_eq!(
            flat,
            "Why passwords matter\nThey guard everything.\nlength\nuniqueness\nTable: Examples"
        );
    }

    #[test]
    fn flatten_labels_exercises() {
        let section = section(
            r#"{
                "id": "1.2", "title": "Practice",
                "content": [
                    {"kind": "practical-exercise", "title": "Audit your passwords",
                     "introduction": "Open your manager.",
                     "tasks": [{"id": "t1", "description": "List reused passwords"}],
                     "expected_outcome": "A shortlist to rotate."}
                ]
            }"#,
        );
        let flat = flatten_section(&section);
        assert!(flat.starts_with("Practical Exercise: Audit your passwords"));
        assert!(flat.contains("List reused passwords"));
    }

    #[test]
    fn artifact_prompt_carries_titles_and_content() {
        let section = section(
            r#"{"id": "1.1", "title": "Phishing", "content": [
                {"kind": "paragraph", "text": "Phishing is social engineering by email."}
            ]}"#,
        );
        let prompt = artifact_prompt(ArtifactKind::Takeaways, "Email Security", &section);
        assert!(prompt.contains("titled \"Phishing\" from chapter \"Email Security\""));
        assert!(prompt.contains("social engineering"));
        assert!(prompt.contains("\"key_takeaways\""));
    }

    #[test]
    fn chat_context_is_bounded() {
        let long_text = "x".repeat(5000);
        let section = section(&format!(
            r#"{{"id": "1.1", "title": "Long", "content": [
                {{"kind": "paragraph", "text": "{long_text}"}}
            ]}}"#
        ));
        let prompt = chat_prompt("Chapter", &section, "What is this about?");
        assert!(prompt.contains(&format!("{}...", "x".repeat(CHAT_CONTEXT_BUDGET))));
        assert!(!prompt.contains(&"x".repeat(CHAT_CONTEXT_BUDGET + 1)));
        assert!(prompt.contains("Question: \"What is this about?\""));
    }

    #[test]
    fn chat_excerpt_respects_char_boundaries() {
        // Multi-byte characters near the cut must not split.
        let text = "é".repeat(2000);
        let section = section(&format!(
            r#"{{"id": "1.1", "title": "Accents", "content": [
                {{"kind": "paragraph", "text": "{text}"}}
            ]}}"#
        ));
        let prompt = chat_prompt("Chapter", &section, "q");
        assert!(prompt.contains(&"é".repeat(CHAT_CONTEXT_BUDGET)));
    }

    #[test]
    fn short_content_gets_no_ellipsis() {
        let section = section(
            r#"{"id": "1.1", "title": "Short", "content": [
                {"kind": "paragraph", "text": "brief"}
            ]}"#,
        );
        let prompt = chat_prompt("Chapter", &section, "q");
        assert!(prompt.contains(r#""""brief""""#));
        assert!(!prompt.contains("brief..."));
    }
}
