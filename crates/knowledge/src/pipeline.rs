//! Message to reply orchestration.
//!
//! message → classify → {canned reply | aggregation reply | cascade →
//! context → generation}. No failure escapes as raw text: store and
//! embedding errors become the unavailable reply, empty retrievals become
//! their terminal reply.

use crate::answer::AnswerGenerator;
use crate::cascade::{Caller, RetrievalCascade, RetrievalOutcome, Terminal};
use crate::context::assemble_context;
use crate::intent::{classify, Intent};
use crate::replies;
use hrdesk_core::AppResult;
use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};

/// How a reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Canned,
    Terminal,
    Generated,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatResponse {
    pub intent: Intent,
    pub kind: ReplyKind,
    pub answer: String,
    /// Ids of the documents the answer was grounded on
    pub sources: Vec<String>,
}

impl ChatResponse {
    fn canned(intent: Intent, answer: impl Into<String>) -> Self {
        Self {
            intent,
            kind: ReplyKind::Canned,
            answer: answer.into(),
            sources: Vec::new(),
        }
    }

    fn terminal(intent: Intent, terminal: &Terminal) -> Self {
        Self {
            intent,
            kind: ReplyKind::Terminal,
            answer: terminal.reply(),
            sources: Vec::new(),
        }
    }
}

pub struct ChatPipeline {
    cascade: RetrievalCascade,
    generator: AnswerGenerator,
}

impl ChatPipeline {
    pub fn new(cascade: RetrievalCascade, generator: AnswerGenerator) -> Self {
        Self { cascade, generator }
    }

    /// Answer `message`, optionally scoped to the employee `employee_id`.
    pub async fn chat(&self, message: &str, employee_id: Option<&str>) -> String {
        self.respond(message, employee_id).await.answer
    }

    /// Like [`chat`](Self::chat), also reporting intent and sources.
    pub async fn respond(&self, message: &str, employee_id: Option<&str>) -> ChatResponse {
        let intent = classify(message);
        let span = info_span!("chat", %intent, scoped = employee_id.is_some());

        async {
            info!("Handling message");
            match intent {
                Intent::SmallTalk => ChatResponse::canned(intent, replies::GREETING),
                Intent::Aggregation => ChatResponse::canned(intent, replies::aggregation(message)),
                _ => match self.retrieve_and_answer(intent, message, employee_id).await {
                    Ok(response) => response,
                    Err(e) => {
                        warn!(error = %e, "Retrieval failed");
                        ChatResponse {
                            intent,
                            kind: ReplyKind::Unavailable,
                            answer: replies::ASSISTANT_UNAVAILABLE.to_string(),
                            sources: Vec::new(),
                        }
                    }
                },
            }
        }
        .instrument(span)
        .await
    }

    async fn retrieve_and_answer(
        &self,
        intent: Intent,
        message: &str,
        employee_id: Option<&str>,
    ) -> AppResult<ChatResponse> {
        let caller: Option<Caller> = match employee_id {
            Some(id) => match self.cascade.resolve_caller(id).await? {
                Some(caller) => Some(caller),
                None => {
                    info!(employee_id = id, "Caller has no employee document");
                    return Ok(ChatResponse::terminal(
                        intent,
                        &Terminal::EmployeeProfileMissing,
                    ));
                }
            },
            None => None,
        };

        let documents = match self
            .cascade
            .retrieve(intent, message, caller.as_ref())
            .await?
        {
            RetrievalOutcome::Documents(documents) => documents,
            RetrievalOutcome::Terminal(terminal) => {
                info!(?terminal, "No documents to answer from");
                return Ok(ChatResponse::terminal(intent, &terminal));
            }
        };

        let context = assemble_context(&documents);
        let answer = self.generator.generate(message, &context).await;
        let kind = if answer == replies::ASSISTANT_UNAVAILABLE {
            ReplyKind::Unavailable
        } else {
            ReplyKind::Generated
        };

        Ok(ChatResponse {
            intent,
            kind,
            answer,
            sources: documents.into_iter().map(|d| d.id).collect(),
        })
    }
}
