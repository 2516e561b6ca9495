//! Error types for the switchboard

use thiserror::Error;
use tower::BoxError;

/// Result type alias for the switchboard
pub type Result<T> = std::result::Result<T, SwitchboardError>;

/// Main error type for the switchboard.
///
/// Variants fall into two groups. Setup errors (see [`is_setup_error`]) mean the
/// agent graph is misconfigured and should abort startup. Routing errors are
/// reported back to the session as a failed tool call instead.
///
/// [`is_setup_error`]: SwitchboardError::is_setup_error
#[derive(Debug, Error)]
pub enum SwitchboardError {
    /// No agent is registered under the requested id
    #[error("Agent not found: {id}")]
    AgentNotFound { id: String },

    /// The name is neither an agent nor a tool of the active agent
    #[error("Tool not found: {name} (active agent: {agent})")]
    ToolNotFound { name: String, agent: String },

    /// An agent with this id is already registered
    #[error("Duplicate agent: {id}")]
    DuplicateAgent { id: String },

    /// A tool name would be indistinguishable from another tool or an agent id
    #[error("Name collision in agent {agent}: {name}")]
    NameCollision { name: String, agent: String },

    /// The instruction template references a placeholder without a value
    #[error("Missing template parameter: {name}")]
    MissingParameter { name: String },

    /// The instruction template has an unbalanced brace
    #[error("Invalid template at byte {position}: {message}")]
    InvalidTemplate { position: usize, message: String },

    /// The root alias was used before a root agent was registered
    #[error("No root agent registered yet")]
    NoRootYet,

    /// The id is reserved for the root alias
    #[error("Agent id is reserved: {id}")]
    ReservedAgentId { id: String },

    /// Registration was attempted after the root agent sealed the registry
    #[error("Registry is sealed; cannot register agent {id}")]
    RegistrySealed { id: String },

    /// A root agent has already been registered
    #[error("Root agent already registered: {existing}")]
    RootAlreadyRegistered { existing: String },

    /// A tool handler returned an error
    #[error("Tool {tool} failed: {source}")]
    HandlerExecution {
        tool: String,
        #[source]
        source: BoxError,
    },

    /// A tool handler did not finish within the configured timeout
    #[error("Tool {tool} timed out after {timeout_ms}ms")]
    HandlerTimeout { tool: String, timeout_ms: u128 },

    /// Error building an OpenAI tool spec
    #[error("OpenAI API error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SwitchboardError {
    /// Stable, machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AgentNotFound { .. } => "agent_not_found",
            Self::ToolNotFound { .. } => "tool_not_found",
            Self::DuplicateAgent { .. } => "duplicate_agent",
            Self::NameCollision { .. } => "name_collision",
            Self::MissingParameter { .. } => "missing_parameter",
            Self::InvalidTemplate { .. } => "invalid_template",
            Self::NoRootYet => "no_root_yet",
            Self::ReservedAgentId { .. } => "reserved_agent_id",
            Self::RegistrySealed { .. } => "registry_sealed",
            Self::RootAlreadyRegistered { .. } => "root_already_registered",
            Self::HandlerExecution { .. } => "handler_execution",
            Self::HandlerTimeout { .. } => "handler_timeout",
            Self::OpenAI(_) => "openai",
            Self::Serialization(_) => "serialization",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }

    /// Whether this error indicates a misconfigured agent graph.
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateAgent { .. }
                | Self::NameCollision { .. }
                | Self::MissingParameter { .. }
                | Self::InvalidTemplate { .. }
                | Self::NoRootYet
                | Self::ReservedAgentId { .. }
                | Self::RegistrySealed { .. }
                | Self::RootAlreadyRegistered { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SwitchboardError::ToolNotFound {
            name: "unknown_tool".to_string(),
            agent: "Assistant_RootAssistant".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Tool not found: unknown_tool (active agent: Assistant_RootAssistant)"
        );

        let err = SwitchboardError::MissingParameter {
            name: "language".to_string(),
        };
        assert_eq!(err.to_string(), "Missing template parameter: language");
    }

    #[test]
    fn test_handler_error_keeps_source() {
        let err = SwitchboardError::HandlerExecution {
            tool: "fetch_billing_details".to_string(),
            source: "billing backend unavailable".into(),
        };
        assert!(err.to_string().contains("billing backend unavailable"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_setup_vs_routing_classification() {
        assert!(SwitchboardError::DuplicateAgent { id: "a".into() }.is_setup_error());
        assert!(SwitchboardError::NoRootYet.is_setup_error());
        assert!(!SwitchboardError::AgentNotFound { id: "a".into() }.is_setup_error());
        assert!(!SwitchboardError::ToolNotFound {
            name: "t".into(),
            agent: "a".into()
        }
        .is_setup_error());
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SwitchboardError = json_err.into();
        assert_eq!(err.code(), "serialization");
    }
}
