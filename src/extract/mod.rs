//! Call extraction: ask the completion capability to pick a function and
//! interpret what comes back.

pub mod reply;

pub use reply::{interpret_reply, is_no_function_reply, Extraction};

use crate::config::ExtractorConfig;
use crate::prompt::{build_instruction, render_catalog};
use crate::transport::CompletionProvider;
use crate::types::{Catalog, Message, MessageRole};
use crate::Result;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct CallExtractor {
    config: ExtractorConfig,
}

impl CallExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Instruction followed by the user/assistant turns of `history`.
    ///
    /// `history` is expected to be normalized already.
    pub fn build_prompt(&self, history: &[Message], catalog: &Catalog) -> Vec<Message> {
        let instruction = build_instruction(&render_catalog(catalog));
        std::iter::once(Message::system(instruction))
            .chain(history.iter().filter(|m| m.is_conversational()).cloned())
            .collect()
    }

    /// Run one extraction round.
    ///
    /// Returns [`Extraction::Skipped`] without calling the provider when the
    /// last conversational turn is not the user's. Provider failures surface
    /// as [`crate::Error::CompletionUnavailable`].
    pub async fn extract<P>(
        &self,
        provider: &P,
        history: &[Message],
        catalog: &Catalog,
    ) -> Result<Extraction>
    where
        P: CompletionProvider + ?Sized,
    {
        let last_role = history
            .iter()
            .rev()
            .find(|m| m.is_conversational())
            .map(|m| m.role);
        if last_role != Some(MessageRole::User) {
            debug!("last turn is not from the user; skipping extraction");
            return Ok(Extraction::Skipped);
        }

        let prompt = self.build_prompt(history, catalog);
        let reply = provider.complete(&prompt).await?;
        Ok(self.interpret(reply))
    }

    pub fn interpret(&self, reply: String) -> Extraction {
        interpret_reply(reply, self.config.lenient_json)
    }
}
