//! Agent runtime: drives reasoning passes over a [`Session`].
//!
//! A pass repeats extract → govern → dispatch, feeding each function result
//! back into the history, until the model answers in text (the no-function
//! phrase included), nothing actionable is left, or the round limit is
//! reached. In the last two cases the model is asked once more, without the
//! catalog, for a plain answer.

mod session;

pub use session::{ReasoningPass, Session};

use crate::config::PromptCallConfig;
use crate::extract::{CallExtractor, Extraction};
use crate::governor::{RejectReason, Verdict};
use crate::prompt::normalize_history;
use crate::registry::FunctionRegistry;
use crate::transport::{CompletionError, CompletionProvider, HttpCompletionProvider};
use crate::types::{Catalog, FunctionCall, Message};
use crate::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Result of one extraction round after governance.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Approved; the caller should execute it.
    Call(FunctionCall),
    /// The model answered in plain text (verbatim reply).
    Text(String),
    /// Nothing to execute this round.
    NoCall(Disposition),
}

/// Why a round produced no executable call.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    Rejected { name: String, reason: RejectReason },
    SuppressedDuplicate { name: String },
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedCall {
    pub call: FunctionCall,
    pub output: String,
    pub failed: bool,
}

/// Final answer of a pass and the calls executed on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct PassReply {
    pub text: String,
    pub calls: Vec<ExecutedCall>,
    pub rounds: usize,
    /// Every round produced a call and the limit cut the pass short.
    pub round_limit_reached: bool,
}

pub struct PromptCallAgent {
    provider: Arc<dyn CompletionProvider>,
    registry: Arc<FunctionRegistry>,
    extractor: CallExtractor,
    max_rounds: usize,
}

impl PromptCallAgent {
    pub fn new(provider: Arc<dyn CompletionProvider>, registry: Arc<FunctionRegistry>) -> Self {
        let defaults = PromptCallConfig::default();
        Self {
            provider,
            registry,
            extractor: CallExtractor::new(defaults.extractor),
            max_rounds: defaults.runtime.max_rounds,
        }
    }

    /// Agent talking to the configured HTTP endpoint.
    pub fn from_config(config: &PromptCallConfig, registry: Arc<FunctionRegistry>) -> Result<Self> {
        config.validate()?;
        let provider = HttpCompletionProvider::new(&config.completion)?;
        Ok(Self::new(Arc::new(provider), registry).with_config(config))
    }

    pub fn with_config(mut self, config: &PromptCallConfig) -> Self {
        self.extractor = CallExtractor::new(config.extractor.clone());
        self.max_rounds = config.runtime.max_rounds.max(1);
        self
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// One round: normalize, extract, govern.
    pub async fn step(
        &self,
        pass: &mut ReasoningPass,
        history: &[Message],
        catalog: &Catalog,
    ) -> Result<StepOutcome> {
        let normalized = normalize_history(history)?;
        let extraction = self
            .extractor
            .extract(self.provider.as_ref(), &normalized, catalog)
            .await?;

        let call = match extraction {
            Extraction::Candidate(call) => call,
            Extraction::Text(text) => return Ok(StepOutcome::Text(text)),
            Extraction::Skipped => return Ok(StepOutcome::NoCall(Disposition::Skipped)),
        };

        match pass.governor.review(call, catalog) {
            Verdict::Approved(call) => {
                debug!(pass_id = %pass.id(), function = %call.name, "function call approved");
                Ok(StepOutcome::Call(call))
            }
            Verdict::Rejected { call, reason } => {
                warn!(pass_id = %pass.id(), function = %call.name, %reason, "invalid function call");
                Ok(StepOutcome::NoCall(Disposition::Rejected {
                    name: call.name,
                    reason,
                }))
            }
            Verdict::SuppressedDuplicate(call) => {
                info!(
                    pass_id = %pass.id(),
                    function = %call.name,
                    "function already called with these arguments in this pass"
                );
                Ok(StepOutcome::NoCall(Disposition::SuppressedDuplicate { name: call.name }))
            }
        }
    }

    /// Run a full pass over `history`, appending function results and the
    /// final assistant answer to it.
    pub async fn run_pass(&self, history: &mut Vec<Message>) -> Result<PassReply> {
        let catalog = self.registry.catalog();
        let mut pass = ReasoningPass::new();
        let mut calls = Vec::new();

        let mut exhausted = true;
        while pass.rounds < self.max_rounds {
            pass.rounds += 1;
            match self.step(&mut pass, history, catalog).await? {
                StepOutcome::Call(call) => {
                    let executed = self.execute(&pass, call).await;
                    history.push(Message::function_result(executed.output.clone()));
                    calls.push(executed);
                }
                // Plain text, including the no-function phrase, is the answer.
                StepOutcome::Text(text) => {
                    history.push(Message::assistant(text.clone()));
                    return Ok(PassReply {
                        text,
                        calls,
                        rounds: pass.rounds,
                        round_limit_reached: false,
                    });
                }
                StepOutcome::NoCall(disposition) => {
                    debug!(pass_id = %pass.id(), ?disposition, "no executable call");
                    exhausted = false;
                    break;
                }
            }
        }

        if exhausted {
            info!(pass_id = %pass.id(), rounds = pass.rounds, "round limit reached");
        }

        let text = self.provider.complete(&normalize_history(history)?).await?;
        history.push(Message::assistant(text.clone()));
        Ok(PassReply {
            text,
            calls,
            rounds: pass.rounds,
            round_limit_reached: exhausted,
        })
    }

    /// Append the user's message and run a pass with a fresh ledger.
    ///
    /// The pass works on a copy of the history; the session only sees the new
    /// turns once the pass succeeds.
    pub async fn respond(&self, session: &mut Session, user_text: impl Into<String>) -> Result<PassReply> {
        let mut history = session.history().to_vec();
        history.push(Message::user(user_text));
        let reply = self.run_pass(&mut history).await?;
        session.commit(history);
        Ok(reply)
    }

    /// Like [`respond`](Self::respond), aborting when `cancel` fires. The
    /// in-flight completion is dropped and the session left as it was.
    pub async fn respond_with_cancel(
        &self,
        session: &mut Session,
        user_text: impl Into<String>,
        cancel: &CancellationToken,
    ) -> Result<PassReply> {
        let session_id = session.id();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(session_id = %session_id, "pass cancelled");
                Err(CompletionError::Cancelled.into())
            }
            reply = self.respond(session, user_text) => reply,
        }
    }

    async fn execute(&self, pass: &ReasoningPass, call: FunctionCall) -> ExecutedCall {
        match self.registry.dispatch(&call).await {
            Ok(output) => ExecutedCall {
                call,
                output,
                failed: false,
            },
            Err(e) => {
                warn!(pass_id = %pass.id(), function = %call.name, error = %e, "function call failed");
                ExecutedCall {
                    output: format!(
                        "The function call failed and returned no data. Tell the user about this error: {}",
                        e
                    ),
                    call,
                    failed: true,
                }
            }
        }
    }
}

impl std::fmt::Debug for PromptCallAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptCallAgent")
            .field("registry", &self.registry)
            .field("extractor", &self.extractor)
            .field("max_rounds", &self.max_rounds)
            .finish()
    }
}
