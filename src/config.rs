//! Runtime configuration from the environment.
//!
//! Binaries load `.env` before calling [`GenieConfig::from_env`]; command-line
//! flags are then layered on top with [`GenieConfig::with_overrides`].

use std::env;
use std::path::PathBuf;

use tracing::debug;

use crate::commit::{CommitComposer, DEFAULT_COMMIT_PREFIX, SummaryChain};
use crate::error::ConfigError;
use crate::llm::{Provider, ProviderSelection};
use crate::openai::OpenAiSettings;
use crate::prompt::{TranslationExample, default_translation_examples, load_translation_examples};

pub const PROVIDER_ENV_VAR: &str = "GIT_GENIE_PROVIDER";
pub const SUMMARY_CHAIN_ENV_VAR: &str = "GIT_GENIE_SUMMARY_CHAIN";
pub const COMMIT_PREFIX_ENV_VAR: &str = "GIT_GENIE_COMMIT_PREFIX";
pub const EXAMPLES_ENV_VAR: &str = "GIT_GENIE_EXAMPLES";

#[derive(Debug, Clone, PartialEq)]
pub struct GenieConfig {
    pub provider: Provider,
    pub summary_chain: SummaryChain,
    /// `None` disables the commit message marker.
    pub commit_prefix: Option<String>,
    pub examples_path: Option<PathBuf>,
    pub openai: OpenAiSettings,
}

impl Default for GenieConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Claude,
            summary_chain: SummaryChain::default(),
            commit_prefix: Some(DEFAULT_COMMIT_PREFIX.to_string()),
            examples_path: None,
            openai: OpenAiSettings::default(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl GenieConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = non_empty_var(PROVIDER_ENV_VAR) {
            config.provider = Provider::from_id(&raw).ok_or(ConfigError::InvalidValue {
                key: PROVIDER_ENV_VAR,
                value: raw,
                expected: "claude, codex, openai",
            })?;
        }

        if let Some(raw) = non_empty_var(SUMMARY_CHAIN_ENV_VAR) {
            config.summary_chain =
                SummaryChain::from_id(&raw).ok_or(ConfigError::InvalidValue {
                    key: SUMMARY_CHAIN_ENV_VAR,
                    value: raw,
                    expected: "stuff, map-reduce",
                })?;
        }

        // Set but empty means "no prefix"; unset keeps the default.
        if let Ok(prefix) = env::var(COMMIT_PREFIX_ENV_VAR) {
            config.commit_prefix = Some(prefix).filter(|p| !p.is_empty());
        }

        config.examples_path = non_empty_var(EXAMPLES_ENV_VAR).map(PathBuf::from);
        config.openai = OpenAiSettings::from_env();

        debug!(
            "Config: provider={}, summary_chain={}, prefix={:?}",
            config.provider, config.summary_chain, config.commit_prefix
        );
        Ok(config)
    }

    /// Apply command-line flags, which win over the environment.
    pub fn with_overrides(
        mut self,
        provider: Option<Provider>,
        summary_chain: Option<SummaryChain>,
        no_prefix: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }
        if let Some(chain) = summary_chain {
            self.summary_chain = chain;
        }
        if no_prefix {
            self.commit_prefix = None;
        }
        self
    }

    pub fn selection(&self) -> ProviderSelection {
        ProviderSelection::from_primary(self.provider)
    }

    pub fn composer(&self) -> CommitComposer {
        CommitComposer::new(self.summary_chain, self.commit_prefix.clone())
    }

    /// The configured example table, or the built-in one.
    pub fn translation_examples(&self) -> Result<Vec<TranslationExample>, ConfigError> {
        match &self.examples_path {
            Some(path) => load_translation_examples(path),
            None => Ok(default_translation_examples()),
        }
    }
}
