//! The two-step research run: retrieve snippets, then draft an answer.
//!
//! [`ResearchPipeline::run`] walks one query through retrieval and drafting
//! and reports the result as a [`RunOutcome`] rather than an error, so the
//! CLI and the gateway decide presentation themselves. Session history is
//! appended only when both steps succeed.

use crate::config::{Config, DraftingConfig, SearchConfig};
use crate::error::{DraftingError, RetrievalError};
use crate::llm::{ChatProvider, OpenAiCompatibleClient};
use crate::prompt::{TeraEngine, assemble_research_context, build_drafting_prompt, drafting_engine};
use crate::search::{SearchProvider, SearchSnippet, TavilyClient};
use crate::session::SessionHistory;

/// Uniform user-facing signal for a run that produced nothing to draft from,
/// whether retrieval returned an empty set or failed outright.
pub const NO_SNIPPETS_MESSAGE: &str = "No research snippets were retrieved. Try again!";

/// One research request with its knobs already clamped into range.
#[derive(Debug, Clone)]
pub struct ResearchQuery {
    question: String,
    max_results: u8,
    temperature: f32,
}

impl ResearchQuery {
    /// Build a query, clamping `max_results` and `temperature` into their
    /// supported ranges. Out-of-range knobs are silently pulled back rather
    /// than rejected.
    pub fn new(question: impl Into<String>, max_results: u8, temperature: f32) -> Self {
        Self {
            question: question.into(),
            max_results: SearchConfig::clamp_results(max_results),
            temperature: DraftingConfig::clamp_temperature(temperature),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn max_results(&self) -> u8 {
        self.max_results
    }

    /// The creativity knob recorded on this run. Shown to the user, but the
    /// drafting client pins its own sampling temperature; see
    /// `llm::compatible`.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

/// What a single run produced. History changes only on [`RunOutcome::Drafted`].
#[derive(Debug)]
pub enum RunOutcome {
    /// Retrieval and drafting both succeeded; the entry was appended to the
    /// session history.
    Drafted {
        snippets: Vec<SearchSnippet>,
        answer: String,
    },
    /// Nothing usable came back from retrieval: a clean empty result set
    /// (`error: None`) or a provider failure (`error: Some`). The drafter is
    /// never consulted either way.
    NoSnippets { error: Option<RetrievalError> },
    /// Snippets arrived but the draft call failed. The snippets are kept so
    /// callers can still show what was retrieved.
    DraftFailed {
        snippets: Vec<SearchSnippet>,
        error: DraftingError,
    },
}

/// Retrieval and drafting glued together over pluggable providers.
pub struct ResearchPipeline<S, C> {
    search: S,
    chat: C,
    engine: TeraEngine,
}

impl ResearchPipeline<TavilyClient, OpenAiCompatibleClient> {
    /// Wire the stock Tavily + Groq providers from config. Fails when either
    /// API key is missing.
    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        let search_key = config.require_search_key()?;
        let search = TavilyClient::new(&config.search.base_url, search_key, config.search.depth);

        let drafting_key = config.require_drafting_key()?;
        let chat = OpenAiCompatibleClient::new(
            "groq",
            &config.drafting.base_url,
            drafting_key,
            &config.drafting.model,
        );

        Self::new(search, chat)
    }
}

impl<S: SearchProvider, C: ChatProvider> ResearchPipeline<S, C> {
    pub fn new(search: S, chat: C) -> crate::error::Result<Self> {
        let engine = drafting_engine().map_err(DraftingError::from)?;
        Ok(Self {
            search,
            chat,
            engine,
        })
    }

    /// Run one query through both steps.
    ///
    /// Appends `(question, answer)` to `history` only when the draft
    /// succeeds; every other outcome leaves `history` exactly as it was.
    pub async fn run(&self, query: &ResearchQuery, history: &mut SessionHistory) -> RunOutcome {
        tracing::info!(
            provider = self.search.name(),
            max_results = query.max_results(),
            "retrieving snippets"
        );
        let snippets = match self
            .search
            .retrieve(query.question(), query.max_results())
            .await
        {
            Ok(snippets) => snippets,
            Err(error) => {
                tracing::warn!(error = %error, "snippet retrieval failed");
                return RunOutcome::NoSnippets { error: Some(error) };
            }
        };
        if snippets.is_empty() {
            tracing::info!("retrieval returned no snippets; skipping draft");
            return RunOutcome::NoSnippets { error: None };
        }

        let research = assemble_research_context(&snippets);
        let prompt = match build_drafting_prompt(&self.engine, query.question(), &research) {
            Ok(prompt) => prompt,
            Err(error) => {
                return RunOutcome::DraftFailed {
                    snippets,
                    error: DraftingError::from(error),
                };
            }
        };

        tracing::info!(
            provider = self.chat.name(),
            model = self.chat.model(),
            snippets = snippets.len(),
            "drafting answer"
        );
        match self.chat.complete(&prompt).await {
            Ok(answer) => {
                history.append(query.question(), answer.clone());
                RunOutcome::Drafted { snippets, answer }
            }
            Err(error) => {
                tracing::warn!(error = %error, "drafting failed");
                RunOutcome::DraftFailed { snippets, error }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    enum SearchScript {
        Snippets(Vec<serde_json::Value>),
        Fail,
    }

    struct ScriptedSearch {
        script: SearchScript,
        calls: Arc<AtomicUsize>,
        seen_limits: Arc<Mutex<Vec<u8>>>,
    }

    impl ScriptedSearch {
        fn new(script: SearchScript) -> (Self, Arc<AtomicUsize>, Arc<Mutex<Vec<u8>>>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let seen_limits = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    script,
                    calls: calls.clone(),
                    seen_limits: seen_limits.clone(),
                },
                calls,
                seen_limits,
            )
        }
    }

    #[async_trait]
    impl SearchProvider for ScriptedSearch {
        fn name(&self) -> &str {
            "scripted-search"
        }

        async fn retrieve(
            &self,
            _query: &str,
            limit: u8,
        ) -> Result<Vec<SearchSnippet>, RetrievalError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_limits.lock().unwrap().push(limit);
            match &self.script {
                SearchScript::Snippets(raw) => Ok(raw
                    .iter()
                    .cloned()
                    .map(SearchSnippet::from_value)
                    .collect()),
                SearchScript::Fail => Err(RetrievalError::Api {
                    status: 500,
                    message: "search backend unavailable".into(),
                }),
            }
        }
    }

    struct ScriptedChat {
        answer: Option<String>,
        calls: Arc<AtomicUsize>,
        seen_prompts: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedChat {
        fn new(answer: Option<&str>) -> (Self, Arc<AtomicUsize>, Arc<Mutex<Vec<String>>>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let seen_prompts = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    answer: answer.map(str::to_owned),
                    calls: calls.clone(),
                    seen_prompts: seen_prompts.clone(),
                },
                calls,
                seen_prompts,
            )
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedChat {
        fn name(&self) -> &str {
            "scripted-chat"
        }

        fn model(&self) -> &str {
            "test-model"
        }

        async fn complete(&self, prompt: &str) -> Result<String, DraftingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_prompts.lock().unwrap().push(prompt.to_owned());
            match &self.answer {
                Some(answer) => Ok(answer.clone()),
                None => Err(DraftingError::Api {
                    status: 503,
                    message: "model overloaded".into(),
                }),
            }
        }
    }

    fn content_snippet(text: &str) -> serde_json::Value {
        json!({ "title": "t", "url": "https://example.com", "content": text })
    }

    #[tokio::test]
    async fn successful_run_drafts_and_records() {
        let (search, _, _) = ScriptedSearch::new(SearchScript::Snippets(vec![
            content_snippet("Qubits exploit superposition."),
            content_snippet("Entanglement links qubit states."),
        ]));
        let (chat, chat_calls, prompts) = ScriptedChat::new(Some("Quantum computers use qubits."));
        let pipeline = ResearchPipeline::new(search, chat).unwrap();
        let mut history = SessionHistory::new();

        let query = ResearchQuery::new("What is quantum computing?", 5, 0.3);
        let outcome = pipeline.run(&query, &mut history).await;

        match outcome {
            RunOutcome::Drafted { snippets, answer } => {
                assert_eq!(snippets.len(), 2);
                assert_eq!(answer, "Quantum computers use qubits.");
            }
            other => panic!("expected Drafted, got {other:?}"),
        }
        assert_eq!(history.len(), 1);
        let entry = history.latest().unwrap();
        assert_eq!(entry.query, "What is quantum computing?");
        assert_eq!(entry.answer, "Quantum computers use qubits.");

        assert_eq!(chat_calls.load(Ordering::SeqCst), 1);
        let prompts = prompts.lock().unwrap();
        assert!(prompts[0].contains("What is quantum computing?"));
        assert!(
            prompts[0].contains("Qubits exploit superposition.\n\nEntanglement links qubit states.")
        );
        assert!(prompts[0].ends_with("Answer:\n"));
    }

    #[tokio::test]
    async fn empty_retrieval_skips_the_drafter() {
        let (search, search_calls, _) = ScriptedSearch::new(SearchScript::Snippets(Vec::new()));
        let (chat, chat_calls, _) = ScriptedChat::new(Some("never used"));
        let pipeline = ResearchPipeline::new(search, chat).unwrap();
        let mut history = SessionHistory::new();

        let query = ResearchQuery::new("anything", 5, 0.3);
        let outcome = pipeline.run(&query, &mut history).await;

        assert!(matches!(outcome, RunOutcome::NoSnippets { error: None }));
        assert_eq!(search_calls.load(Ordering::SeqCst), 1);
        assert_eq!(chat_calls.load(Ordering::SeqCst), 0);
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn retrieval_failure_reports_the_error_and_skips_the_drafter() {
        let (search, _, _) = ScriptedSearch::new(SearchScript::Fail);
        let (chat, chat_calls, _) = ScriptedChat::new(Some("never used"));
        let pipeline = ResearchPipeline::new(search, chat).unwrap();
        let mut history = SessionHistory::new();

        let query = ResearchQuery::new("anything", 5, 0.3);
        let outcome = pipeline.run(&query, &mut history).await;

        match outcome {
            RunOutcome::NoSnippets { error: Some(error) } => {
                assert!(matches!(error, RetrievalError::Api { status: 500, .. }));
            }
            other => panic!("expected NoSnippets with error, got {other:?}"),
        }
        assert_eq!(chat_calls.load(Ordering::SeqCst), 0);
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn draft_failure_keeps_snippets_and_history_untouched() {
        let (search, _, _) = ScriptedSearch::new(SearchScript::Snippets(vec![
            content_snippet("one"),
            content_snippet("two"),
            content_snippet("three"),
        ]));
        let (chat, _, _) = ScriptedChat::new(None);
        let pipeline = ResearchPipeline::new(search, chat).unwrap();
        let mut history = SessionHistory::new();

        let query = ResearchQuery::new("anything", 5, 0.3);
        let outcome = pipeline.run(&query, &mut history).await;

        match outcome {
            RunOutcome::DraftFailed { snippets, error } => {
                assert_eq!(snippets.len(), 3);
                assert!(matches!(error, DraftingError::Api { status: 503, .. }));
            }
            other => panic!("expected DraftFailed, got {other:?}"),
        }
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn history_grows_only_across_successful_runs() {
        let mut history = SessionHistory::new();

        let (search, _, _) =
            ScriptedSearch::new(SearchScript::Snippets(vec![content_snippet("fact")]));
        let (chat, _, _) = ScriptedChat::new(Some("first answer"));
        let ok_pipeline = ResearchPipeline::new(search, chat).unwrap();
        ok_pipeline
            .run(&ResearchQuery::new("first", 5, 0.3), &mut history)
            .await;
        assert_eq!(history.len(), 1);

        let (search, _, _) =
            ScriptedSearch::new(SearchScript::Snippets(vec![content_snippet("fact")]));
        let (chat, _, _) = ScriptedChat::new(None);
        let failing_pipeline = ResearchPipeline::new(search, chat).unwrap();
        failing_pipeline
            .run(&ResearchQuery::new("second", 5, 0.3), &mut history)
            .await;
        assert_eq!(history.len(), 1);

        ok_pipeline
            .run(&ResearchQuery::new("third", 5, 0.3), &mut history)
            .await;
        assert_eq!(history.len(), 2);

        let numbers: Vec<usize> = history.recent().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![2, 1]);
        assert_eq!(history.latest().unwrap().query, "third");
    }

    #[tokio::test]
    async fn requested_limit_is_forwarded_after_clamping() {
        let (search, _, seen_limits) =
            ScriptedSearch::new(SearchScript::Snippets(vec![content_snippet("fact")]));
        let (chat, _, _) = ScriptedChat::new(Some("answer"));
        let pipeline = ResearchPipeline::new(search, chat).unwrap();
        let mut history = SessionHistory::new();

        pipeline
            .run(&ResearchQuery::new("a", 7, 0.3), &mut history)
            .await;
        pipeline
            .run(&ResearchQuery::new("b", 0, 0.3), &mut history)
            .await;
        pipeline
            .run(&ResearchQuery::new("c", 200, 0.3), &mut history)
            .await;

        assert_eq!(*seen_limits.lock().unwrap(), vec![7, 3, 10]);
    }

    #[test]
    fn out_of_range_knobs_are_clamped_on_construction() {
        let low = ResearchQuery::new("q", 0, -0.5);
        assert_eq!(low.max_results(), 3);
        assert_eq!(low.temperature(), 0.0);

        let high = ResearchQuery::new("q", 42, 9.5);
        assert_eq!(high.max_results(), 10);
        assert_eq!(high.temperature(), 1.0);

        let in_range = ResearchQuery::new("q", 5, 0.3);
        assert_eq!(in_range.max_results(), 5);
        assert_eq!(in_range.temperature(), 0.3);
    }
}
