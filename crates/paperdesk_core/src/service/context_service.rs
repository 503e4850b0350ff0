//! Generation context selection.
//!
//! # Responsibility
//! - Collect the papers visible to the generation service and compose the
//!   outbound instruction payload plus ordered message sequence.
//! - Split paper content on the chain divider to recover the seed replayed
//!   as an assistant turn.
//!
//! # Invariants
//! - Selection is pure: identical inputs yield identical output, and the
//!   returned structures share nothing with the project snapshot. The live
//!   generation call and the read-only preview both go through here.
//! - Only papers in active folders participate; the main stack, trash and
//!   archive never do, whatever their flags say.

use crate::model::project::{Desk, Project};
use serde::Serialize;

/// Literal divider inserted between chained responses.
pub const CHAIN_DIVIDER: &str = "\n\n---\n\n";

const REFERENCE_HEADER: &str = "== Reference Documents ==";

/// One chat turn in the outbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Chat role of an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Assistant,
    User,
}

/// A paper selected into context, in final render order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextDocument {
    /// Subject, falling back to `Untitled` when blank.
    pub subject: String,
    pub content: String,
}

/// Composed generation input: messages plus the documents they embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextBundle {
    pub messages: Vec<ChatMessage>,
    pub documents: Vec<ContextDocument>,
}

/// Result of splitting content on the last chain divider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSplit {
    /// Content before the last divider, or the whole content.
    pub seed: String,
    /// Whether a divider was found at all.
    pub has_divider: bool,
}

/// Builds the ordered message sequence and reference-document block.
///
/// Walks left-desk folders then right-desk folders, in list order, taking
/// papers (in list order) from active folders whose own flag does not
/// exclude them, skipping papers with blank subject and content. The
/// optional `seed` becomes an assistant turn between the system instruction
/// and the user message, letting the service continue a truncated prior
/// answer without re-sending it as user input.
pub fn build_context(
    project: &Project,
    system_prompt: &str,
    user_prompt: &str,
    seed: Option<&str>,
) -> ContextBundle {
    let mut documents = Vec::new();
    collect_from_desk(project, &project.left_desk, &mut documents);
    collect_from_desk(project, &project.right_desk, &mut documents);

    let mut full_system = system_prompt.to_string();
    if !documents.is_empty() {
        let sections: Vec<String> = documents
            .iter()
            .enumerate()
            .map(|(index, document)| {
                format!(
                    "--- Document {}: {} ---\n{}",
                    index + 1,
                    document.subject,
                    document.content
                )
            })
            .collect();
        full_system.push_str(&format!(
            "\n\n{REFERENCE_HEADER}\n{}",
            sections.join("\n\n")
        ));
    }

    let mut messages = vec![ChatMessage {
        role: Role::System,
        content: full_system,
    }];
    if let Some(seed) = seed.filter(|seed| !seed.is_empty()) {
        messages.push(ChatMessage {
            role: Role::Assistant,
            content: seed.to_string(),
        });
    }
    if !user_prompt.is_empty() {
        messages.push(ChatMessage {
            role: Role::User,
            content: user_prompt.to_string(),
        });
    }

    ContextBundle {
        messages,
        documents,
    }
}

fn collect_from_desk(project: &Project, desk: &Desk, documents: &mut Vec<ContextDocument>) {
    for folder in &desk.folders {
        if !project.is_folder_active(folder.id) {
            continue;
        }
        for paper in &folder.papers {
            if !paper.in_context.is_included() || paper.is_blank() {
                continue;
            }
            documents.push(ContextDocument {
                subject: if paper.subject.is_empty() {
                    "Untitled".to_string()
                } else {
                    paper.subject.clone()
                },
                content: paper.content.clone(),
            });
        }
    }
}

/// Splits content before the last chain divider.
///
/// Without any divider the whole content is the seed, flagged accordingly.
pub fn extract_seed(content: &str) -> SeedSplit {
    match content.rfind(CHAIN_DIVIDER) {
        Some(index) => SeedSplit {
            seed: content[..index].to_string(),
            has_divider: true,
        },
        None => SeedSplit {
            seed: content.to_string(),
            has_divider: false,
        },
    }
}
