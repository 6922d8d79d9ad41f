//! Command explanation in man-page style.

use crate::llm::{CompletionModel, LlmError};
use crate::prompt::{ExplanationExample, FewShotPrompt};

const PREFIX: &str = "Give a detailed explanation of the following git command. \
Explain each part of the command separately, similar to how it would be explained in a unix man page. \
Put each part on its own line in the form `part -> meaning`.";

const SUFFIX: &str = "Command: {input}\nExplanation:";

pub fn build_explanation_prompt(examples: &[ExplanationExample], command: &str) -> String {
    FewShotPrompt::new(PREFIX, SUFFIX).render(examples, command.trim())
}

/// Ask the model to explain `command` token by token.
pub async fn explain(
    model: &mut dyn CompletionModel,
    examples: &[ExplanationExample],
    command: &str,
) -> Result<String, LlmError> {
    let prompt = build_explanation_prompt(examples, command);
    let explanation = model.complete(&prompt).await?;
    Ok(explanation.trim().to_string())
}
