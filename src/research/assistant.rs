//! The research pipeline: one query in, one research result out.

use std::path::PathBuf;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use super::context::load_context;
use super::guard::{RequestBudget, sanitize_input};
use super::prompt::build_prompt;
use crate::austlii::{CaseRecord, CaseSearch};
use crate::config::{AppConfig, Jurisdiction};
use crate::error::ResearchError;
use crate::llm::ChatBackend;

/// Everything produced for one research query.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchResult {
    /// The query as the user typed it, trimmed
    pub query: String,
    pub jurisdiction: &'static Jurisdiction,
    pub cases: Vec<CaseRecord>,
    /// The LLM's reply, unmodified
    pub analysis: String,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
}

/// Runs research queries one at a time against a chat backend and an optional case search.
pub struct Assistant<B, S> {
    backend: B,                   // LLM dispatcher
    searcher: Option<S>,          // None when search is disabled
    budget: RequestBudget,        // Session request budget
    context_files: Vec<PathBuf>, // Files attached to every query
}

impl<B: ChatBackend, S: CaseSearch> Assistant<B, S> {
    pub fn new(config: &AppConfig, backend: B, searcher: Option<S>) -> Self {
        Self {
            backend,
            searcher,
            budget: RequestBudget::new(config.max_requests, config.budget_window()),
            context_files: config.context_files.clone(),
        }
    }

    /// Research a query for a jurisdiction.
    ///
    /// # Errors
    /// - `EmptyQuery` if nothing is left after trimming and sanitizing
    /// - `BudgetExceeded` if the session's request budget is used up
    /// - `Remote` if the LLM call fails
    ///
    /// Search and context-file problems are logged and do not fail the query.
    pub async fn research(&self, query: &str, jurisdiction: &'static Jurisdiction) -> Result<ResearchResult, ResearchError> {
        let query = query.trim();
        let sanitized = sanitize_input(query);
        if sanitized.trim().is_empty() {
            return Err(ResearchError::EmptyQuery);
        }

        self.budget.try_acquire()?;

        let cases = match &self.searcher {
            Some(searcher) => {
                info!("🔍 Searching AustLII database...");
                let cases = searcher.search(&sanitized, jurisdiction).await;
                info!("✅ Found {} cases", cases.len());
                cases
            }
            None => Vec::new(),
        };

        let context = if self.context_files.is_empty() {
            String::new()
        } else {
            info!("📄 Processing {} context file(s)...", self.context_files.len());
            load_context(&self.context_files).await
        };
        if !self.context_files.is_empty() && context.is_empty() {
            warn!("No usable context found in the attached files");
        }

        let prompt = sanitize_input(&build_prompt(jurisdiction, &sanitized, &context, &cases));
        debug!("Prompt is {} chars", prompt.chars().count());

        info!("🤖 Analyzing with Grok...");
        let analysis = self.backend.complete(&prompt).await?;
        info!("✅ Analysis complete");

        Ok(ResearchResult {
            query: query.to_string(),
            jurisdiction,
            cases,
            analysis,
            generated_at: OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;
    use parking_lot::Mutex;

    use crate::config::jurisdictions::get_jurisdiction;
    use crate::error::RemoteApiError;

    enum Reply {
        Text(&'static str),
        Status(u16),
    }

    struct FakeBackend {
        reply: Reply,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        fn new(reply: Reply) -> Self {
            Self { reply, prompts: Mutex::new(Vec::new()) }
        }
    }

    impl ChatBackend for &FakeBackend {
        async fn complete(&self, prompt: &str) -> Result<String, RemoteApiError> {
            self.prompts.lock().push(prompt.to_string());
            match self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Status(code) => Err(RemoteApiError::Status(code)),
            }
        }
    }

    struct FakeSearch;

    impl CaseSearch for FakeSearch {
        async fn search(&self, query: &str, jurisdiction: &Jurisdiction) -> Vec<CaseRecord> {
            vec![CaseRecord {
                title: format!("DPP v {} ({})", query, jurisdiction.code),
                citation: "[2024]".to_string(),
                url: "http://www.austlii.edu.au/au/cases/vic/VSC/2024/1.html".to_string(),
                year: Some("2024".to_string()),
                summary: String::new(),
            }]
        }
    }

    fn config(args: &[&str]) -> AppConfig {
        let mut argv = vec!["legal-eagle"];
        argv.extend_from_slice(args);
        AppConfig::try_parse_from(argv).unwrap()
    }

    fn vic() -> &'static Jurisdiction {
        get_jurisdiction("vic").unwrap()
    }

    #[tokio::test]
    async fn test_research_returns_backend_reply_verbatim() {
        let backend = FakeBackend::new(Reply::Text("## Summarized Legislation\n- s 77 Crimes Act"));
        let assistant = Assistant::new(&config(&[]), &backend, Some(FakeSearch));

        let result = assistant.research("  Smith burglary  ", vic()).await.unwrap();

        assert_eq!(result.analysis, "## Summarized Legislation\n- s 77 Crimes Act");
        assert_eq!(result.query, "Smith burglary");
        assert_eq!(result.jurisdiction.name, "Victoria");
        assert_eq!(result.cases.len(), 1);

        let prompts = backend.prompts.lock();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("DPP v Smith burglary (vic) [2024]"));
        assert!(prompts[0].contains("Crimes Act 1958 (Vic)"));
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected_without_calling_backend() {
        let backend = FakeBackend::new(Reply::Text("unused"));
        let assistant = Assistant::new(&config(&[]), &backend, Some(FakeSearch));

        assert!(matches!(assistant.research("   ", vic()).await, Err(ResearchError::EmptyQuery)));
        assert!(matches!(assistant.research("<script", vic()).await, Err(ResearchError::EmptyQuery)));
        assert!(backend.prompts.lock().is_empty());
    }

    #[tokio::test]
    async fn test_remote_error_is_surfaced() {
        let backend = FakeBackend::new(Reply::Status(502));
        let assistant = Assistant::new(&config(&[]), &backend, None::<FakeSearch>);

        let err = assistant.research("bail", vic()).await.unwrap_err();
        assert!(matches!(err, ResearchError::Remote(RemoteApiError::Status(502))));

        // The assistant keeps working after a failure
        assert!(assistant.research("bail", vic()).await.is_err());
        assert_eq!(backend.prompts.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_budget_exceeded() {
        let backend = FakeBackend::new(Reply::Text("ok"));
        let assistant = Assistant::new(&config(&["--max-requests", "1"]), &backend, None::<FakeSearch>);

        assert!(assistant.research("first", vic()).await.is_ok());
        assert!(matches!(assistant.research("second", vic()).await, Err(ResearchError::BudgetExceeded { limit: 1, .. })));
        assert_eq!(backend.prompts.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_skip_search_sends_no_cases() {
        let backend = FakeBackend::new(Reply::Text("ok"));
        let assistant = Assistant::new(&config(&[]), &backend, None::<FakeSearch>);

        let result = assistant.research("drink driving", get_jurisdiction("nsw").unwrap()).await.unwrap();
        assert!(result.cases.is_empty());
        assert!(backend.prompts.lock()[0].ends_with("- Match the format of the example EXACTLY"));
    }

    #[tokio::test]
    async fn test_query_is_sanitized_before_prompting() {
        let backend = FakeBackend::new(Reply::Text("ok"));
        let assistant = Assistant::new(&config(&[]), &backend, None::<FakeSearch>);

        let result = assistant.research(" theft onerror=1 javascript:void ", vic()).await.unwrap();
        assert_eq!(result.query, "theft onerror=1 javascript:void");

        let prompts = backend.prompts.lock();
        assert!(prompts[0].contains("theft =1 void"));
        assert!(!prompts[0].contains("javascript:"));
        assert!(!prompts[0].contains("onerror"));
    }

    #[tokio::test]
    async fn test_sanitized_query_is_what_gets_searched() {
        struct RecordingSearch(Mutex<Vec<String>>);

        impl CaseSearch for &RecordingSearch {
            async fn search(&self, query: &str, _jurisdiction: &Jurisdiction) -> Vec<CaseRecord> {
                self.0.lock().push(query.to_string());
                Vec::new()
            }
        }

        let backend = FakeBackend::new(Reply::Text("ok"));
        let search = RecordingSearch(Mutex::new(Vec::new()));
        let assistant = Assistant::new(&config(&[]), &backend, Some(&search));

        assistant.research("assault eval(x)", vic()).await.unwrap();
        assert_eq!(*search.0.lock(), vec!["assault x)".to_string()]);
    }

    #[tokio::test]
    async fn test_rejected_queries_do_not_use_budget() {
        let backend = FakeBackend::new(Reply::Text("ok"));
        let assistant = Assistant::new(&config(&["--max-requests", "1"]), &backend, None::<FakeSearch>);

        assert!(matches!(assistant.research("   ", vic()).await, Err(ResearchError::EmptyQuery)));
        assert!(matches!(assistant.research("<script", vic()).await, Err(ResearchError::EmptyQuery)));
        assert!(matches!(assistant.research("javascript:onclick", vic()).await, Err(ResearchError::EmptyQuery)));

        assert!(assistant.research("bail variation", vic()).await.is_ok());
        assert_eq!(backend.prompts.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_context_files_reach_the_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let brief = dir.path().join("brief.txt");
        std::fs::write(&brief, "Client has two prior theft convictions").unwrap();

        let backend = FakeBackend::new(Reply::Text("ok"));
        let assistant = Assistant::new(&config(&["--context", brief.to_str().unwrap()]), &backend, None::<FakeSearch>);

        assistant.research("bail", vic()).await.unwrap();
        assert!(backend.prompts.lock()[0].contains("Context from files: Client has two prior theft convictions"));
    }
}
