//! Curriculum loading, addressing, and validation.
//!
//! The curriculum is supplied whole at startup as one JSON document. The core
//! does not validate authoring correctness beyond lenient node decoding (see
//! `model`); `validate` reports warnings for the authoring workflow without
//! ever refusing to load.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Chapter, ContentNode, NodeBody, Section, SectionAddress};

/// The whole curriculum document.
#[derive(Debug, Clone, Deserialize)]
pub struct Curriculum {
    pub title: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

/// Result of resolving a (chapter, section) address.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub chapter: Option<&'a Chapter>,
    pub section: Option<&'a Section>,
}

impl Curriculum {
    /// Load a curriculum from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read curriculum file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("failed to parse curriculum: {}", path.display()))
    }

    /// Parse a curriculum from a JSON string (useful for testing).
    pub fn from_json(content: &str) -> Result<Self> {
        let curriculum: Curriculum = serde_json::from_str(content)?;
        Ok(curriculum)
    }

    /// Resolve a chapter id and optional section id. Pure lookup, no mutation:
    /// an unknown chapter yields `{None, None}`; a known chapter with an
    /// unknown or absent section yields `{Some, None}`.
    pub fn resolve(&self, chapter_id: &str, section_id: Option<&str>) -> Resolved<'_> {
        let Some(chapter) = self.chapters.iter().find(|c| c.id == chapter_id) else {
            return Resolved {
                chapter: None,
                section: None,
            };
        };
        let section = section_id.and_then(|sid| chapter.sections.iter().find(|s| s.id == sid));
        Resolved {
            chapter: Some(chapter),
            section,
        }
    }

    /// Resolve an address to its section, or `None` if either component does
    /// not match ("no section selected").
    pub fn section_at(&self, addr: &SectionAddress) -> Option<(&Chapter, &Section)> {
        let resolved = self.resolve(&addr.chapter_id, Some(&addr.section_id));
        match (resolved.chapter, resolved.section) {
            (Some(c), Some(s)) => Some((c, s)),
            _ => None,
        }
    }

    /// End-of-chapter content is shown only after the last section of its
    /// chapter.
    pub fn end_of_chapter_for(&self, addr: &SectionAddress) -> Option<&[ContentNode]> {
        let (chapter, section) = self.section_at(addr)?;
        let is_last = chapter
            .sections
            .last()
            .is_some_and(|last| last.id == section.id);
        if is_last {
            chapter.end_of_chapter_content.as_deref()
        } else {
            None
        }
    }

    /// Address of the first section of the first chapter, the default landing
    /// spot for a fresh session.
    pub fn first_address(&self) -> Option<SectionAddress> {
        let chapter = self.chapters.first()?;
        let section = chapter.sections.first()?;
        Some(SectionAddress::new(&chapter.id, &section.id))
    }

    /// Validate the curriculum for common authoring issues.
    pub fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen_chapters = std::collections::HashSet::new();

        for chapter in &self.chapters {
            if !seen_chapters.insert(&chapter.id) {
                warnings.push(ValidationWarning {
                    location: chapter.id.clone(),
                    message: format!("duplicate chapter id: {}", chapter.id),
                });
            }

            let mut seen_sections = std::collections::HashSet::new();
            for section in &chapter.sections {
                let location = format!("{}/{}", chapter.id, section.id);
                if !seen_sections.insert(&section.id) {
                    warnings.push(ValidationWarning {
                        location: location.clone(),
                        message: format!("duplicate section id: {}", section.id),
                    });
                }
                if section.content.is_empty() {
                    warnings.push(ValidationWarning {
                        location: location.clone(),
                        message: "section has no content".into(),
                    });
                }
                warn_diagnostic_nodes(&section.content, &location, &mut warnings);
            }

            if let Some(extra) = &chapter.end_of_chapter_content {
                warn_diagnostic_nodes(extra, &chapter.id, &mut warnings);
            }

            if chapter.sections.is_empty() {
                warnings.push(ValidationWarning {
                    location: chapter.id.clone(),
                    message: "chapter has no sections".into(),
                });
            }
        }

        warnings
    }
}

fn warn_diagnostic_nodes(
    nodes: &[ContentNode],
    location: &str,
    warnings: &mut Vec<ValidationWarning>,
) {
    for (index, node) in nodes.iter().enumerate() {
        match &node.body {
            NodeBody::Unsupported => warnings.push(ValidationWarning {
                location: format!("{location}#{index}"),
                message: format!("unsupported content kind: {}", node.kind),
            }),
            NodeBody::Malformed { reason } => warnings.push(ValidationWarning {
                location: format!("{location}#{index}"),
                message: format!("malformed {} node: {reason}", node.kind),
            }),
            _ => {}
        }
    }
}

/// A warning from curriculum validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Where in the tree the problem sits, e.g. "chapter-1/1.2#3".
    pub location: String,
    /// Warning message.
    pub message: String,
}
