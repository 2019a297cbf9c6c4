//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes vocabulary analysis to AI assistants over stdio. The server is a
//! presentation layer: every `#[tool]` delegates to `futuresness-core`.
//!
//! One [`Analyzer`] is compiled at startup and shared by all requests.
//! Reports are memoized in a [`ResultCache`] keyed by a fingerprint of the
//! text and options, so repeated requests for the same document are cheap.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use futuresness_core::config::Config;
use futuresness_core::{
    AnalysisReport, AnalyzeOptions, Analyzer, CacheKey, ResultCache, check_input, export,
};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `analyze_text` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeTextParams {
    /// The document text to analyze.
    pub text: String,
    /// Co-occurrence window in characters (default from server config).
    pub window: Option<i64>,
    /// Whether to include context snippets (default from server config).
    pub include_snippets: Option<bool>,
}

/// Parameters for the `export_terms_csv` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ExportTermsCsvParams {
    /// The document text to analyze.
    pub text: String,
}

/// Parameters for the `list_vocabulary` tool.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct ListVocabularyParams {
    /// Include every term, not only per-category counts.
    #[serde(default)]
    pub include_terms: bool,
}

/// MCP server for futures-studies vocabulary analysis.
#[derive(Clone)]
pub struct FuturesServer {
    analyzer: Arc<Analyzer>,
    cache: Arc<Mutex<ResultCache>>,
    defaults: AnalyzeOptions,
    input_limit: Option<usize>,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

#[tool_router]
impl FuturesServer {
    /// Create a server around a compiled analyzer, configured by `config`.
    pub fn new(analyzer: Analyzer, config: &Config) -> Self {
        let cache = config.result_cache();
        tracing::debug!(
            capacity = cache.capacity(),
            ttl_secs = cache.ttl().as_secs(),
            "result cache ready"
        );
        Self {
            analyzer: Arc::new(analyzer),
            cache: Arc::new(Mutex::new(cache)),
            defaults: config.analyze_options(),
            input_limit: config.input_limit(),
            tool_router: Self::tool_router(),
        }
    }

    /// Analyze `text`, serving from the cache when possible.
    fn cached_analysis(
        &self,
        text: &str,
        options: &AnalyzeOptions,
    ) -> Result<AnalysisReport, McpError> {
        check_input(text, self.input_limit)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let key = CacheKey::new(text, options);
        Ok(get_or_analyze(&self.cache, key, || self.analyzer.analyze(text, options)))
    }

    /// Get project information.
    #[tool(description = "Get futuresness name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let vocabulary = self.analyzer.vocabulary();
        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "categories": vocabulary.category_count(),
            "terms": vocabulary.term_count(),
        });

        let text = if params.format == "json" {
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            format!(
                "{} v{}\n{}\nVocabulary: {} categories, {} terms",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
                vocabulary.category_count(),
                vocabulary.term_count(),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Full vocabulary analysis of a document.
    #[tool(
        description = "Analyze futures-studies vocabulary in text. Returns matched terms with positions and snippets, density statistics, category distribution, co-occurring term pairs, methodological approach scores, and term clusters."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", text_len = params.text.len()))]
    fn analyze_text(
        &self,
        Parameters(params): Parameters<AnalyzeTextParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "analyze_text", window = ?params.window, "executing MCP tool");

        let options = AnalyzeOptions {
            cooccurrence_window: params.window.unwrap_or(self.defaults.cooccurrence_window),
            snippet_context: match params.include_snippets {
                Some(false) => None,
                Some(true) => self
                    .defaults
                    .snippet_context
                    .or(Some(futuresness_core::matcher::DEFAULT_SNIPPET_CONTEXT)),
                None => self.defaults.snippet_context,
            },
        };
        let report = self.cached_analysis(&params.text, &options)?;

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "analyze_text",
            total_terms = report.statistics.total_terms,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Matched terms of a document as CSV.
    #[tool(
        description = "Analyze text and return matched futures terms as CSV with columns term, category, frequency, snippets."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", text_len = params.text.len()))]
    fn export_terms_csv(
        &self,
        Parameters(params): Parameters<ExportTermsCsvParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "export_terms_csv", "executing MCP tool");

        let report = self.cached_analysis(&params.text, &self.defaults)?;
        let csv = export::terms_csv(&report.term_matches)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        tracing::info!(
            tool = "export_terms_csv",
            rows = report.term_matches.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(csv)]))
    }

    /// The vocabulary categories in use.
    #[tool(description = "List the futures-studies vocabulary categories, with term counts and optionally the terms.")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn list_vocabulary(
        &self,
        Parameters(params): Parameters<ListVocabularyParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "list_vocabulary", "executing MCP tool");

        let categories: Vec<serde_json::Value> = self
            .analyzer
            .vocabulary()
            .categories()
            .iter()
            .map(|c| {
                let mut entry = serde_json::json!({
                    "name": c.name,
                    "term_count": c.terms.len(),
                });
                if params.include_terms {
                    entry["terms"] = serde_json::json!(c.terms);
                }
                entry
            })
            .collect();
        let json = serde_json::to_string_pretty(&serde_json::json!({ "categories": categories }))
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(tool = "list_vocabulary", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

/// Look `key` up in `cache`, running `analyze` on a miss.
///
/// The lock is held only for the lookup and the insert, never while
/// analyzing, so requests for other documents are not serialized behind a
/// long analysis. Two concurrent misses on the same key both analyze; the
/// later insert wins.
fn get_or_analyze(
    cache: &Mutex<ResultCache>,
    key: CacheKey,
    analyze: impl FnOnce() -> AnalysisReport,
) -> AnalysisReport {
    let lock = || cache.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(report) = lock().get(&key, Instant::now()) {
        tracing::debug!(key = key.as_str(), "cache hit");
        return report;
    }
    let report = analyze();
    lock().put(key, report.clone(), Instant::now());
    report
}

#[tool_handler]
impl ServerHandler for FuturesServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use analyze_text to measure futures-studies vocabulary in a document.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    fn server() -> FuturesServer {
        FuturesServer::new(Analyzer::builtin().unwrap(), &Config::default())
    }

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn analyze(server: &FuturesServer, text: &str) -> serde_json::Value {
        let result = server
            .analyze_text(Parameters(AnalyzeTextParams {
                text: text.to_string(),
                window: None,
                include_snippets: None,
            }))
            .expect("analyze_text should succeed");
        serde_json::from_str(extract_text(&result).unwrap()).expect("valid JSON")
    }

    #[test]
    fn server_info_has_correct_name() {
        let info = ServerHandler::get_info(&server());
        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("analyze_text"));
    }

    #[test]
    fn get_info_tool_json() {
        let result = server()
            .get_info(Parameters(GetInfoParams {
                format: "json".to_string(),
            }))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(extract_text(&result).unwrap()).unwrap();
        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(json["categories"], 9);
    }

    #[test]
    fn get_info_tool_text() {
        let result = server()
            .get_info(Parameters(GetInfoParams {
                format: "text".to_string(),
            }))
            .unwrap();
        let text = extract_text(&result).unwrap();
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
        assert!(text.contains("9 categories"));
    }

    #[test]
    fn analyze_text_tool_reports_matches() {
        let json = analyze(
            &server(),
            "Scenario planning and horizon scanning are common foresight methods.",
        );
        assert!(json["statistics"]["total_terms"].as_u64().unwrap() >= 3);
        let terms: Vec<&str> = json["term_matches"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["term"].as_str().unwrap())
            .collect();
        assert!(terms.contains(&"scenario planning"));
        assert!(json["term_matches"][0]["snippets"].is_array());
    }

    #[test]
    fn analyze_text_tool_uses_cache() {
        let server = server();
        let first = analyze(&server, "backcasting and delphi");
        let second = analyze(&server, "backcasting and delphi");
        assert_eq!(first, second);
        assert_eq!(server.cache.lock().unwrap().len(), 1);
    }

    #[test]
    fn cache_follows_config() {
        let config = Config {
            cache_capacity: 7,
            cache_ttl_secs: 42,
            ..Config::default()
        };
        let server = FuturesServer::new(Analyzer::builtin().unwrap(), &config);
        let cache = server.cache.lock().unwrap();
        assert_eq!(cache.capacity(), 7);
        assert_eq!(cache.ttl().as_secs(), 42);
    }

    #[test]
    fn cache_is_unlocked_while_analyzing() {
        let server = server();
        let options = AnalyzeOptions::default();
        let key = CacheKey::new("delphi", &options);
        let report = get_or_analyze(&server.cache, key.clone(), || {
            assert!(server.cache.try_lock().is_ok(), "cache locked during analysis");
            server.analyzer.analyze("delphi", &options)
        });
        assert_eq!(report.statistics.total_terms, 1);

        let cached = get_or_analyze(&server.cache, key, || panic!("expected a cache hit"));
        assert_eq!(cached, report);
    }

    #[test]
    fn analyze_text_tool_honors_options() {
        let result = server()
            .analyze_text(Parameters(AnalyzeTextParams {
                text: "scenario planning causes horizon scanning".to_string(),
                window: Some(0),
                include_snippets: Some(false),
            }))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(extract_text(&result).unwrap()).unwrap();
        assert!(json["co_occurrences"].as_array().unwrap().is_empty());
        assert!(json["term_matches"][0].get("snippets").is_none());
    }

    #[test]
    fn analyze_text_tool_rejects_blank_text() {
        let result = server().analyze_text(Parameters(AnalyzeTextParams {
            text: "  ".to_string(),
            window: None,
            include_snippets: None,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn analyze_text_tool_rejects_oversized_text() {
        let config = Config {
            max_input_chars: Some(4),
            ..Config::default()
        };
        let server = FuturesServer::new(Analyzer::builtin().unwrap(), &config);
        let result = server.analyze_text(Parameters(AnalyzeTextParams {
            text: "delphi method".to_string(),
            window: None,
            include_snippets: None,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn export_terms_csv_tool() {
        let result = server()
            .export_terms_csv(Parameters(ExportTermsCsvParams {
                text: "Delphi, then delphi again.".to_string(),
            }))
            .unwrap();
        let csv = extract_text(&result).unwrap();
        assert!(csv.starts_with("term,category,frequency,snippets\n"));
        assert!(csv.contains("delphi,Foresight Methods,2,"));
    }

    #[test]
    fn list_vocabulary_tool() {
        let result = server()
            .list_vocabulary(Parameters(ListVocabularyParams {
                include_terms: true,
            }))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(extract_text(&result).unwrap()).unwrap();
        let categories = json["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 9);
        assert!(categories[0]["terms"].is_array());

        let result = server()
            .list_vocabulary(Parameters(ListVocabularyParams::default()))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(extract_text(&result).unwrap()).unwrap();
        assert!(json["categories"][0].get("terms").is_none());
    }
}
