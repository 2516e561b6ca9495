//! # Agent definitions
//!
//! An [`AgentDefinition`] is one conversational specialization: an id the
//! model calls to switch to it, a human-readable name, a description shown to
//! other agents, instruction text, and its own tools. Definitions are plain
//! data; the [`AgentRegistry`](crate::registry::AgentRegistry) formats the
//! instructions and wires handoffs when they are registered.

use crate::tool::ToolDescriptor;

/// A named bundle of instructions and tools.
///
/// ## Example
///
/// ```rust
/// use agent_switchboard::{AgentDefinition, ToolDescriptor};
/// use agent_switchboard::tool::empty_parameters;
///
/// let billing = AgentDefinition::new("Assistant_BillingAssistant", "Billing Assistant")
///     .with_description("Call this for billing or payment inquiries.")
///     .with_instructions("You are a billing representative. Answer in {language}.")
///     .with_tool(ToolDescriptor::function(
///         "fetch_billing_details",
///         "Retrieve the customer's current billing details.",
///         empty_parameters(),
///         |_| Ok(serde_json::json!({"balance": 45.75})),
///     ));
///
/// assert_eq!(billing.tools.len(), 1);
/// assert!(billing.tool("fetch_billing_details").is_some());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AgentDefinition {
    /// Globally unique id. This is also the name of the handoff tool other
    /// agents use to switch to this one.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Used as the handoff tool description when this agent is offered to others.
    pub description: String,

    /// Instruction template; formatted once at registration.
    pub instructions: String,

    /// The agent's own tools, in advertised order.
    pub tools: Vec<ToolDescriptor>,
}

impl AgentDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            instructions: String::new(),
            tools: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_tool(mut self, tool: ToolDescriptor) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = ToolDescriptor>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Look up one of this agent's own tools by name.
    pub fn tool(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Whether this agent already has a handoff tool to `target`.
    pub fn hands_off_to(&self, target: &str) -> bool {
        self.tools.iter().any(|t| t.handoff_target() == Some(target))
    }

    /// Iterator over real (non-handoff) tools.
    pub fn function_tools(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter().filter(|t| !t.is_handoff())
    }
}
