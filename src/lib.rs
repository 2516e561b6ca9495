//! # Agent Switchboard
//!
//! Routing for a single live voice/chat session served by several specialized
//! agents. One agent is active at a time; the model sees the active agent's own
//! tools plus one pseudo-tool per other agent, and calling an agent-named tool
//! switches the session over to that agent.
//!
//! ## Core Concepts
//!
//! - **Agents**: an id, a description, templated instructions and a list of tools
//! - **Registry**: registration order, a designated root reachable as `"root"`
//! - **Handoffs**: every non-root agent gets a tool that returns to the root
//! - **Routing**: a tool call either reconfigures the session or runs a handler
//! - **Realtime events**: outcomes rendered as `session.update` /
//!   `conversation.item.create` client events
//!
//! ## Getting Started
//!
//! ```rust,no_run
//! use agent_switchboard::{
//!     tool_typed, AgentDefinition, AgentRegistry, Switchboard, SwitchboardConfig, ToolCall,
//! };
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize, JsonSchema)]
//! struct LookupArgs {
//!     customer_id: String,
//! }
//!
//! # async fn example() -> agent_switchboard::Result<()> {
//! let config = SwitchboardConfig::default();
//! let mut registry = AgentRegistry::new(&config);
//!
//! let lookup = tool_typed(
//!     "fetch_billing_details",
//!     "Look up the customer's balance",
//!     |args: LookupArgs| async move {
//!         Ok::<_, agent_switchboard::BoxError>(serde_json::json!({ "customer": args.customer_id, "balance": 45.75 }))
//!     },
//! )?;
//! registry.register(
//!     AgentDefinition::new("billing", "Billing")
//!         .with_description("Questions about bills and payments")
//!         .with_instructions("Help with billing. Speak {language}.")
//!         .with_tool(lookup),
//! )?;
//! registry.register_root(
//!     AgentDefinition::new("greeter", "Greeter")
//!         .with_instructions("Greet the customer in {language} and route them."),
//! )?;
//!
//! let switchboard = Switchboard::new(config, registry)?;
//! let session = switchboard.open_session()?;
//!
//! let outcome = session
//!     .handle(ToolCall::from_arguments_json("billing", "{}", "call-1"))
//!     .await;
//! let event = switchboard.render(&outcome);
//! println!("{}", serde_json::to_string(&event)?);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod handoff;
pub mod realtime;
pub mod registry;
pub mod router;
pub mod session;
pub mod switchboard;
pub mod template;
pub mod tool;

mod surface;

pub use agent::AgentDefinition;
pub use config::{ConfigBuilder, SwitchboardConfig};
pub use error::{Result, SwitchboardError};
pub use handoff::HandoffInjector;
pub use realtime::{ClientEvent, ConversationItem, SessionConfig, TurnDetection};
pub use registry::{AgentRegistry, ROOT_ALIAS};
pub use router::{
    InvocationRouter, ReconfigurationDirective, RouteFailure, RouteOutcome, Routed,
    ToolResultEnvelope,
};
pub use session::Session;
pub use switchboard::Switchboard;
pub use template::TemplateParams;
pub use tool::{
    empty_parameters, tool_typed, ToolCall, ToolDescriptor, ToolHandler, ToolKind, ToolSpec,
};

// Re-export Tower traits that users need
pub use tower::{BoxError, Service, ServiceExt};
