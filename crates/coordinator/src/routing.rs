//! Routing strategies: which agent (if any) handles a query.
//!
//! Two interchangeable strategies sit behind [`RoutingStrategy`]:
//! deterministic keyword rules ([`HeuristicRouter`]) and a single
//! completion call returning a structured decision ([`ModelRouter`]).

use std::sync::Arc;

use async_trait::async_trait;
use hermes_common::{AgentManifest, HermesError, Result};
use hermes_llm::{ChatMessage, CompletionBackend, CompletionRequest, Role};
use tracing::{debug, warn};

/// Keywords that route a query to an image-capable agent.
const IMAGE_KEYWORDS: &[&str] = &["caption", "image", "picture", "photo", "describe image"];

/// File extensions that, combined with a path-looking query, indicate
/// an image request.
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".tiff"];

/// Keywords that route a query to a document-search agent.
const DOCUMENT_KEYWORDS: &[&str] = &[
    "what",
    "tell me about",
    "explain",
    "describe",
    "python",
    "machine learning",
    "vector",
    "database",
    "protocol",
    "programming",
    "document",
];

/// Terms that identify an image-capable agent in the roster.
const IMAGE_AGENT_TERMS: &[&str] = &["image", "caption", "picture", "photo", "vision"];

/// Terms that identify a document-search agent in the roster.
const DOCUMENT_AGENT_TERMS: &[&str] = &["document", "search", "retrieval", "rag", "knowledge"];

/// Low sampling temperature for consistent routing decisions.
const ROUTING_TEMPERATURE: f32 = 0.3;

/// The outcome of a routing decision: the chosen agent, if any, and why.
///
/// Produced fresh per request; never persisted.
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    /// Name of the chosen agent; `None` means the orchestrator answers
    /// directly
    pub target: Option<String>,

    /// Reasoning for the decision
    pub rationale: String,
}

/// A strategy that selects zero or one target agent for a query.
#[async_trait]
pub trait RoutingStrategy: Send + Sync {
    async fn decide(&self, query: &str, roster: &[AgentManifest]) -> Result<RoutingDecision>;

    /// The reply returned when no agent was targeted.
    fn no_route_reply(&self, roster: &[AgentManifest]) -> String;
}

/// Deterministic keyword/pattern routing.
///
/// The image predicate is checked first and always wins: a query that
/// looks like an image request is never sent to document search.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicRouter;

impl HeuristicRouter {
    pub fn new() -> Self {
        Self
    }

    fn is_image_query(query: &str) -> bool {
        let lower = query.to_lowercase();
        let has_keyword = IMAGE_KEYWORDS.iter().any(|k| lower.contains(k));
        let has_extension = IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext));
        let looks_like_path =
            query.contains('/') || query.contains('\\') || query.starts_with('~');
        has_keyword || (has_extension && looks_like_path)
    }

    fn is_document_query(query: &str) -> bool {
        let lower = query.to_lowercase();
        DOCUMENT_KEYWORDS.iter().any(|k| lower.contains(k))
    }

    /// Find the first roster agent whose manifest mentions one of the
    /// given terms.
    fn find_agent<'a>(roster: &'a [AgentManifest], terms: &[&str]) -> Option<&'a AgentManifest> {
        roster.iter().find(|manifest| {
            let mut haystack = format!("{} {}", manifest.name, manifest.description);
            for skill in &manifest.skills {
                haystack.push(' ');
                haystack.push_str(&skill.name);
                haystack.push(' ');
                haystack.push_str(&skill.description);
                for tag in &skill.tags {
                    haystack.push(' ');
                    haystack.push_str(tag);
                }
            }
            let haystack = haystack.to_lowercase();
            terms.iter().any(|term| haystack.contains(term))
        })
    }
}

#[async_trait]
impl RoutingStrategy for HeuristicRouter {
    async fn decide(&self, query: &str, roster: &[AgentManifest]) -> Result<RoutingDecision> {
        if Self::is_image_query(query) {
            let target = Self::find_agent(roster, IMAGE_AGENT_TERMS);
            return Ok(RoutingDecision {
                target: target.map(|m| m.name.clone()),
                rationale: "Query matches image captioning keywords".into(),
            });
        }

        if Self::is_document_query(query) {
            let target = Self::find_agent(roster, DOCUMENT_AGENT_TERMS);
            return Ok(RoutingDecision {
                target: target.map(|m| m.name.clone()),
                rationale: "Query matches document search keywords".into(),
            });
        }

        Ok(RoutingDecision {
            target: None,
            rationale: "No routing keywords matched".into(),
        })
    }

    fn no_route_reply(&self, roster: &[AgentManifest]) -> String {
        let mut reply = String::from("I can route your request to these agents:\n");
        for manifest in roster {
            reply.push_str(&format!(
                "\n- **{}**: {}",
                manifest.name, manifest.description
            ));
        }
        reply.push_str(
            "\n\nTry asking a question about a document topic, or provide \
             an image path to caption (for example: 'caption: /path/to/image.jpg').",
        );
        reply
    }
}

/// Model-driven routing: one non-streaming completion call returning a
/// strict JSON decision.
pub struct ModelRouter {
    backend: Arc<dyn CompletionBackend>,
}

impl ModelRouter {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    fn system_prompt(roster: &[AgentManifest]) -> String {
        let mut agents_list = String::new();
        for manifest in roster {
            agents_list.push_str(&format!(
                "\n- **{}**: {}",
                manifest.name, manifest.description
            ));
        }

        format!(
            r#"You are an expert orchestrator that routes user requests to specialized agents.

**Available Agents:**{agents_list}

**Your Task:**
Analyze the user's query and determine which agent is most appropriate to handle it.

**Response Format:**
Respond ONLY with a JSON object in this exact format:
{{
    "agent": "agent_name_here",
    "reasoning": "brief explanation"
}}

**Guidelines:**
- Choose the agent that best matches the query intent
- Use the agent's name exactly as listed above
- If no agent is appropriate, use "none""#
        )
    }

    /// Parse the model's reply into a decision.
    ///
    /// Valid JSON uses the `agent` field verbatim (`"none"` clears the
    /// target). Unparseable replies fall back to scanning the raw text
    /// for a known agent name; no match means no target.
    fn parse_decision(raw: &str, roster: &[AgentManifest]) -> RoutingDecision {
        if let Some(json_str) = extract_json_object(raw) {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(json_str) {
                let agent = value
                    .get("agent")
                    .and_then(|v| v.as_str())
                    .unwrap_or("none");
                let rationale = value
                    .get("reasoning")
                    .and_then(|v| v.as_str())
                    .unwrap_or("No reasoning provided")
                    .to_string();
                let target = if agent.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(agent.to_string())
                };
                return RoutingDecision { target, rationale };
            }
        }

        warn!("Routing reply was not valid JSON, scanning for agent names");
        let lower = raw.to_lowercase();
        for manifest in roster {
            if lower.contains(&manifest.name.to_lowercase()) {
                return RoutingDecision {
                    target: Some(manifest.name.clone()),
                    rationale: "Extracted agent name from unstructured reply".into(),
                };
            }
        }

        RoutingDecision {
            target: None,
            rationale: "Reply did not name a known agent".into(),
        }
    }
}

#[async_trait]
impl RoutingStrategy for ModelRouter {
    async fn decide(&self, query: &str, roster: &[AgentManifest]) -> Result<RoutingDecision> {
        let request = CompletionRequest {
            system_prompt: Some(Self::system_prompt(roster)),
            messages: vec![ChatMessage {
                role: Role::User,
                content: query.to_string(),
            }],
            temperature: Some(ROUTING_TEMPERATURE),
            max_tokens: None,
        };

        let response = self
            .backend
            .complete(request)
            .await
            .map_err(|e| HermesError::Routing(format!("routing completion failed: {e}")))?;

        debug!(reply = %response.content, "Routing model replied");
        Ok(Self::parse_decision(&response.content, roster))
    }

    fn no_route_reply(&self, roster: &[AgentManifest]) -> String {
        let mut reply = String::from(
            "I analyzed your query but couldn't determine an appropriate \
             agent to handle it.\n\nAvailable agents:\n",
        );
        for manifest in roster {
            reply.push_str(&format!(
                "- **{}**: {}\n",
                manifest.name, manifest.description
            ));
        }
        reply.push_str("\nPlease try rephrasing your question or specify what you'd like help with.");
        reply
    }
}

/// Extract a JSON object from a string that may contain other text.
fn extract_json_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let mut depth = 0;
    let mut end = start;

    for (i, c) in s[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = start + i + 1;
                    break;
                }
            }
            _ => {}
        }
    }

    if depth == 0 && end > start {
        Some(&s[start..end])
    } else {
        None
    }
}
