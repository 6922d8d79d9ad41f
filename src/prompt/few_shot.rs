//! Few-shot prompt assembly.

/// Placeholder in a suffix that receives the user input.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Separator between prefix, rendered examples and suffix.
pub const DEFAULT_SEPARATOR: &str = "\n\n";

/// An input/output pair that can be rendered into a prompt.
pub trait Example {
    fn render(&self) -> String;
}

/// A prompt of the shape `prefix`, examples, `suffix`.
///
/// ```
/// use git_genie::prompt::{Example, FewShotPrompt};
///
/// struct Pair(&'static str, &'static str);
///
/// impl Example for Pair {
///     fn render(&self) -> String {
///         format!("Q: {}\nA: {}", self.0, self.1)
///     }
/// }
///
/// let prompt = FewShotPrompt::new("Answer briefly.", "Q: {input}\nA:");
/// let text = prompt.render(&[Pair("2+2", "4")], "3+3");
/// assert_eq!(text, "Answer briefly.\n\nQ: 2+2\nA: 4\n\nQ: 3+3\nA:");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FewShotPrompt<'a> {
    prefix: &'a str,
    suffix: &'a str,
    separator: &'a str,
}

impl<'a> FewShotPrompt<'a> {
    pub fn new(prefix: &'a str, suffix: &'a str) -> Self {
        Self {
            prefix,
            suffix,
            separator: DEFAULT_SEPARATOR,
        }
    }

    pub fn with_separator(mut self, separator: &'a str) -> Self {
        self.separator = separator;
        self
    }

    /// Render the prompt with `input` substituted into the suffix.
    ///
    /// Only the suffix template is searched for the placeholder, so braces
    /// inside the input or the examples are left alone.
    pub fn render<E: Example>(&self, examples: &[E], input: &str) -> String {
        let mut parts = Vec::with_capacity(examples.len() + 2);
        parts.push(self.prefix.to_string());
        parts.extend(examples.iter().map(Example::render));
        parts.push(self.suffix.replace(INPUT_PLACEHOLDER, input));
        parts.join(self.separator)
    }
}
