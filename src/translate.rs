//! Instruction translation: plain English in, one git command out.

use tracing::debug;

use crate::llm::{CompletionModel, LlmError, strip_code_fence};
use crate::prompt::{FewShotPrompt, TranslationExample};

/// Command the model is told to answer with when it cannot map an instruction.
pub const FALLBACK_COMMAND: &str = "git help";

const PREFIX: &str = "You are an interpreter for the command line version control tool git. \
Translate the following human-readable instructions into git commands. \
You can use the following examples as a reference. \
Only return commands that are syntactically correct and produce the desired effect. \
Answer with the command only, on a single line, without explanation. \
If you don't know how to translate an instruction, return 'git help'.";

const SUFFIX: &str = "Instruction: {input}\nCommand:";

/// Build the translation prompt for `instruction`.
pub fn build_translation_prompt(examples: &[TranslationExample], instruction: &str) -> String {
    FewShotPrompt::new(PREFIX, SUFFIX).render(examples, instruction.trim())
}

/// Ask the model for the git command that carries out `instruction`.
///
/// The answer is not validated. Whitespace and a surrounding Markdown code
/// fence are stripped; whatever remains is the command.
pub async fn translate(
    model: &mut dyn CompletionModel,
    examples: &[TranslationExample],
    instruction: &str,
) -> Result<String, LlmError> {
    let prompt = build_translation_prompt(examples, instruction);
    let response = model.complete(&prompt).await?;
    let command = strip_code_fence(&response);
    debug!("Translated '{}' into '{}'", instruction.trim(), command);
    Ok(command)
}
