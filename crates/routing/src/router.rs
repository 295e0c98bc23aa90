use {
    cowork_config::RoutingConfig,
    regex::{RegexSet, RegexSetBuilder},
    tracing::debug,
};

use crate::error::Result;

/// Requests that need file access, code work, or command execution.
const DEFAULT_AGENT_PATTERNS: &[&str] = &[
    r"\b(file|folder|directory|path)\b",
    r"\b(read|write|edit|create|delete|modify|update)\s+(the\s+)?(file|code|script)",
    r"\b(save|store)\s+(to|as|in)\b",
    r"\b(code|script|program|function|class|module)\b",
    r"\b(analyze|review|debug|fix|refactor)\b",
    r"\b(implement|build|develop)\b",
    r"\b(search|find|grep|look\s+for)\b",
    r"\bwhere\s+is\b.*\b(defined|used|called)\b",
    r"\b(run|execute|test|compile|deploy)\b",
    r"\b(install|setup|configure|init)\b",
    r"\bcowork\b",
    r"\bfile\s+access\b",
    // Bare filenames ("fix main.py") imply file work.
    r"\.(txt|md|py|rs|js|ts|json|toml|yaml|yml|sh)\b",
];

/// Small talk and lookups that must never incur a tool invocation.
const DEFAULT_DIRECT_PATTERNS: &[&str] = &[
    r"^(hi|hello|hey|good\s+(morning|afternoon|evening))\b",
    r"\b(weather|time|date|news)\b",
    r"\b(thanks|thank\s+you|bye|goodbye)\b",
    r"\btell\s+me\s+about\b",
];

/// Outcome of routing one message.
#[derive(Debug, Clone)]
pub struct RouteDecision {
    /// True when the message should go to the agentic tool.
    pub to_agent: bool,
    /// Which pattern (or default) produced the decision, for logs.
    pub reason: String,
}

/// Stateless message router over two compiled pattern sets.
///
/// Direct patterns take priority over agent patterns: a message matching
/// both stays on the conversational path.
pub struct Router {
    agent: RegexSet,
    agent_patterns: Vec<String>,
    direct: RegexSet,
    direct_patterns: Vec<String>,
    default_to_agent: bool,
}

impl Router {
    /// Compile the router from config. Empty pattern lists fall back to
    /// the built-in sets. Fails on invalid regexes, so `route` itself
    /// can never error.
    pub fn new(config: &RoutingConfig) -> Result<Self> {
        let agent_patterns = pattern_list(&config.agent_patterns, DEFAULT_AGENT_PATTERNS);
        let direct_patterns = pattern_list(&config.direct_patterns, DEFAULT_DIRECT_PATTERNS);

        let agent = RegexSetBuilder::new(&agent_patterns)
            .case_insensitive(true)
            .build()?;
        let direct = RegexSetBuilder::new(&direct_patterns)
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            agent,
            agent_patterns,
            direct,
            direct_patterns,
            default_to_agent: config.default_to_agent,
        })
    }

    /// Route a message. Pure: no state, no failure — unmatched messages
    /// resolve to the configured default.
    pub fn route(&self, message: &str) -> RouteDecision {
        if let Some(idx) = self.direct.matches(message).iter().next() {
            let decision = RouteDecision {
                to_agent: false,
                reason: format!("direct pattern: {}", self.direct_patterns[idx]),
            };
            debug!(reason = %decision.reason, "routing direct");
            return decision;
        }

        if let Some(idx) = self.agent.matches(message).iter().next() {
            let decision = RouteDecision {
                to_agent: true,
                reason: format!("agent pattern: {}", self.agent_patterns[idx]),
            };
            debug!(reason = %decision.reason, "routing to agent");
            return decision;
        }

        RouteDecision {
            to_agent: self.default_to_agent,
            reason: "no pattern matched, using default".into(),
        }
    }
}

fn pattern_list(configured: &[String], builtin: &[&str]) -> Vec<String> {
    if configured.is_empty() {
        builtin.iter().map(|p| (*p).to_string()).collect()
    } else {
        configured.to_vec()
    }
}
