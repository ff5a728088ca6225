use crate::governor::{CallGovernor, DedupeLedger};
use crate::types::Message;
use uuid::Uuid;

/// One user's conversation. Owned by the caller and passed in per turn.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    history: Vec<Message>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            history: Vec::new(),
        }
    }

    /// Start with a caller system prompt used for the final plain answer.
    pub fn with_system(prompt: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.history.push(Message::system(prompt));
        session
    }

    pub fn from_history(history: Vec<Message>) -> Self {
        Self {
            id: Uuid::new_v4(),
            history,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn push(&mut self, message: Message) {
        self.history.push(message);
    }

    /// Replace the history with the outcome of a finished pass.
    pub(crate) fn commit(&mut self, history: Vec<Message>) {
        self.history = history;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one reasoning pass: its governor (and so its dedupe ledger) and
/// the number of extraction rounds used. Dropped when the pass ends.
#[derive(Debug)]
pub struct ReasoningPass {
    id: Uuid,
    pub(crate) governor: CallGovernor,
    pub(crate) rounds: usize,
}

impl ReasoningPass {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            governor: CallGovernor::new(),
            rounds: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn ledger(&self) -> &DedupeLedger {
        self.governor.ledger()
    }

    /// Explicit reset: forget approved calls and rounds.
    pub fn reset(&mut self) {
        self.governor.reset();
        self.rounds = 0;
    }
}

impl Default for ReasoningPass {
    fn default() -> Self {
        Self::new()
    }
}
