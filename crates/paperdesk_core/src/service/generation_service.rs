//! Generation request orchestration.
//!
//! # Responsibility
//! - Gate and prepare generation requests for the top-of-stack paper.
//! - Enforce per-paper exclusivity through the lock set.
//! - Apply settled responses against the latest snapshot.
//!
//! # Invariants
//! - At most one in-flight request per paper id; a second request is
//!   rejected, never queued.
//! - Locks are cleared unconditionally when a request settles, success or
//!   failure.
//! - Failures record no version and leave the snapshot untouched.
//! - Completion re-locates the target paper by id in the snapshot passed
//!   at completion time, never splicing in a pre-captured paper.

use crate::ai::AiError;
use crate::model::paper::PaperId;
use crate::model::project::Project;
use crate::service::context_service::{build_context, extract_seed, ChatMessage, CHAIN_DIVIDER};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// How a settled response is applied to the target paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Response becomes the paper's entire new content.
    Replace,
    /// Response is appended after a chain divider.
    Chain,
    /// Seeded like Chain, but the response replaces the content outright.
    ClearRewrite,
}

/// Rejection raised before a request is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The stack is empty; there is no target paper.
    EmptyStack,
    /// The target paper already has an outstanding request.
    PaperLocked(PaperId),
    /// The user prompt is empty after trimming.
    MissingPrompt,
    /// No credential configured.
    MissingCredential,
    /// Chain/ClearRewrite need existing content to seed from.
    PaperContentRequired(PaperId),
}

impl Display for GenerationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStack => write!(f, "no paper on the stack to generate into"),
            Self::PaperLocked(id) => write!(f, "paper already awaiting a response: {id}"),
            Self::MissingPrompt => write!(f, "prompt must not be empty"),
            Self::MissingCredential => write!(f, "API credential must not be empty"),
            Self::PaperContentRequired(id) => {
                write!(f, "mode requires existing paper content: {id}")
            }
        }
    }
}

impl Error for GenerationError {}

/// A prepared, locked request awaiting its response.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingGeneration {
    pub paper_id: PaperId,
    pub mode: GenerationMode,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Tracks in-flight generations and applies their outcomes.
#[derive(Debug, Default)]
pub struct GenerationService {
    locked: HashSet<PaperId>,
}

impl GenerationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a paper has an outstanding request.
    ///
    /// The input layer also consults this to refuse drags on locked papers.
    pub fn is_locked(&self, paper_id: PaperId) -> bool {
        self.locked.contains(&paper_id)
    }

    /// Number of currently outstanding requests.
    pub fn in_flight(&self) -> usize {
        self.locked.len()
    }

    /// Validates gating rules, locks the target paper, and prepares the
    /// outbound request for the top-of-stack paper.
    pub fn begin(
        &mut self,
        project: &Project,
        mode: GenerationMode,
        user_prompt: &str,
        api_key: &str,
    ) -> Result<PendingGeneration, GenerationError> {
        let user_prompt = user_prompt.trim();
        if user_prompt.is_empty() {
            return Err(GenerationError::MissingPrompt);
        }
        if api_key.trim().is_empty() {
            return Err(GenerationError::MissingCredential);
        }

        let target = project.active_paper().ok_or(GenerationError::EmptyStack)?;
        if self.is_locked(target.id) {
            return Err(GenerationError::PaperLocked(target.id));
        }

        let seed = match mode {
            GenerationMode::Replace => None,
            GenerationMode::Chain | GenerationMode::ClearRewrite => {
                if target.content.trim().is_empty() {
                    return Err(GenerationError::PaperContentRequired(target.id));
                }
                Some(extract_seed(&target.content).seed)
            }
        };

        let bundle = build_context(
            project,
            &project.ai_settings.system_prompt,
            user_prompt,
            seed.as_deref(),
        );

        self.locked.insert(target.id);
        info!(
            "event=generation_begin module=generation status=ok paper={} mode={:?} context_docs={}",
            target.id,
            mode,
            bundle.documents.len()
        );

        Ok(PendingGeneration {
            paper_id: target.id,
            mode,
            messages: bundle.messages,
            temperature: project.ai_settings.temperature,
            max_tokens: project.ai_settings.max_tokens,
        })
    }

    /// Settles a request: unlocks the paper unconditionally, then applies a
    /// successful response against the latest snapshot.
    ///
    /// The target is re-located by id so edits or moves that landed while
    /// the request was outstanding are never overwritten by stale state. A
    /// paper that vanished entirely degrades to an unchanged snapshot.
    pub fn complete(
        &mut self,
        project: &Project,
        pending: &PendingGeneration,
        outcome: Result<String, AiError>,
        now_ms: i64,
    ) -> Result<Project, AiError> {
        self.locked.remove(&pending.paper_id);

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    "event=generation_settle module=generation status=error paper={} kind={}",
                    pending.paper_id,
                    err.title()
                );
                return Err(err);
            }
        };

        let mut next = project.clone();
        let Some(paper) = next.find_paper_mut(pending.paper_id) else {
            warn!(
                "event=generation_settle module=generation status=skipped paper={} reason=target_missing",
                pending.paper_id
            );
            return Ok(next);
        };

        match pending.mode {
            GenerationMode::Replace | GenerationMode::ClearRewrite => {
                paper.content = response;
            }
            GenerationMode::Chain => {
                paper.content = format!("{}{CHAIN_DIVIDER}{}", paper.content, response);
            }
        }
        paper.record_version(now_ms);

        info!(
            "event=generation_settle module=generation status=ok paper={} mode={:?}",
            pending.paper_id, pending.mode
        );
        Ok(next)
    }
}
