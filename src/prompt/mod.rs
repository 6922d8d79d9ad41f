//! Prompt templates shared by the translator and the explainer.

pub mod examples;
pub mod few_shot;

pub use examples::{
    ExplanationExample, TranslationExample, default_explanation_examples,
    default_translation_examples, load_translation_examples,
};
pub use few_shot::{Example, FewShotPrompt};
