//! Summarization chains over diff chunks.

use std::fmt;

use clap::ValueEnum;
use tracing::debug;

use crate::llm::{CompletionModel, LlmError};

const SUMMARY_PROMPT: &str = "Write a concise summary of the following:\n\n\n\"{text}\"\n\n\nCONCISE SUMMARY:";

/// Separator used when stuffing several documents into one prompt.
const DOCUMENT_SEPARATOR: &str = "\n\n";

/// How chunks are turned into a single summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SummaryChain {
    /// All chunks in one prompt.
    #[default]
    Stuff,
    /// One prompt per chunk, then one prompt over the partial summaries.
    MapReduce,
}

impl SummaryChain {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryChain::Stuff => "stuff",
            SummaryChain::MapReduce => "map-reduce",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "stuff" => Some(SummaryChain::Stuff),
            "map-reduce" | "map_reduce" | "mapreduce" => Some(SummaryChain::MapReduce),
            _ => None,
        }
    }
}

impl fmt::Display for SummaryChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn build_summary_prompt(text: &str) -> String {
    SUMMARY_PROMPT.replace("{text}", text)
}

/// Summarize `chunks` with the given chain.
///
/// An empty chunk list still issues one prompt over the empty string so the
/// caller always gets a summary back.
pub async fn summarize(
    model: &mut dyn CompletionModel,
    chain: SummaryChain,
    chunks: &[String],
) -> Result<String, LlmError> {
    match chain {
        SummaryChain::Stuff => stuff(model, chunks).await,
        SummaryChain::MapReduce if chunks.len() <= 1 => stuff(model, chunks).await,
        SummaryChain::MapReduce => {
            let mut partials = Vec::with_capacity(chunks.len());
            for (i, chunk) in chunks.iter().enumerate() {
                debug!("Summarizing chunk {}/{}", i + 1, chunks.len());
                let partial = model.complete(&build_summary_prompt(chunk)).await?;
                partials.push(partial.trim().to_string());
            }
            stuff(model, &partials).await
        }
    }
}

async fn stuff(model: &mut dyn CompletionModel, documents: &[String]) -> Result<String, LlmError> {
    let text = documents.join(DOCUMENT_SEPARATOR);
    let summary = model.complete(&build_summary_prompt(&text)).await?;
    Ok(summary.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::router::MockCompletionModel;
    use mockall::Sequence;

    #[test]
    fn test_from_id() {
        assert_eq!(SummaryChain::from_id("stuff"), Some(SummaryChain::Stuff));
        assert_eq!(SummaryChain::from_id(" Map-Reduce "), Some(SummaryChain::MapReduce));
        assert_eq!(SummaryChain::from_id("map_reduce"), Some(SummaryChain::MapReduce));
        assert_eq!(SummaryChain::from_id("refine"), None);
    }

    #[test]
    fn test_summary_prompt_wraps_text() {
        assert_eq!(
            build_summary_prompt("abc"),
            "Write a concise summary of the following:\n\n\n\"abc\"\n\n\nCONCISE SUMMARY:"
        );
    }

    #[tokio::test]
    async fn test_stuff_sends_one_prompt() {
        let mut model = MockCompletionModel::new();
        model
            .expect_complete()
            .withf(|prompt| prompt.contains("\"one\n\ntwo\""))
            .times(1)
            .returning(|_| Ok(" summary \n".to_string()));

        let chunks = vec!["one".to_string(), "two".to_string()];
        let summary = summarize(&mut model, SummaryChain::Stuff, &chunks).await.unwrap();
        assert_eq!(summary, "summary");
    }

    #[tokio::test]
    async fn test_map_reduce_summarizes_each_chunk_then_combines() {
        let mut model = MockCompletionModel::new();
        let mut seq = Sequence::new();
        model
            .expect_complete()
            .withf(|prompt| prompt.contains("\"one\""))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("first".to_string()));
        model
            .expect_complete()
            .withf(|prompt| prompt.contains("\"two\""))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("second".to_string()));
        model
            .expect_complete()
            .withf(|prompt| prompt.contains("\"first\n\nsecond\""))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("combined".to_string()));

        let chunks = vec!["one".to_string(), "two".to_string()];
        let summary = summarize(&mut model, SummaryChain::MapReduce, &chunks)
            .await
            .unwrap();
        assert_eq!(summary, "combined");
    }

    #[tokio::test]
    async fn test_map_reduce_single_chunk_is_one_call() {
        let mut model = MockCompletionModel::new();
        model
            .expect_complete()
            .times(1)
            .returning(|_| Ok("only".to_string()));

        let chunks = vec!["one".to_string()];
        let summary = summarize(&mut model, SummaryChain::MapReduce, &chunks)
            .await
            .unwrap();
        assert_eq!(summary, "only");
    }
}
