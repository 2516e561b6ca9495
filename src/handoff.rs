//! # Agent handoffs
//!
//! A handoff is a tool that, when called, switches the active agent of a
//! session instead of running a handler. Two kinds exist:
//!
//! - **Agent handoffs**: every registered agent is offered to every other agent
//!   as a zero-argument tool named after its id, described by its description.
//!   These are derived on demand by the surface builder.
//! - **Return to root**: when the root agent is registered, each previously
//!   registered agent gets one extra tool pointing back at the root. This one is
//!   stored in the agent's own tool list.
//!
//! [`HandoffInjector`] builds both and performs the one-time injection.

use tracing::debug;

use crate::agent::AgentDefinition;
use crate::tool::ToolDescriptor;

/// Builds handoff tools and appends return-to-root tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandoffInjector;

impl HandoffInjector {
    /// The tool that routes out-of-scope requests back to `root_id`.
    pub fn return_to_root_tool(root_id: &str) -> ToolDescriptor {
        ToolDescriptor::handoff(
            root_id,
            format!(
                "If customer asks any question that is outside of your work scope, \
                 DO use this to switch back to {root_id}."
            ),
        )
    }

    /// The pseudo-tool offering `agent` to the other agents.
    pub fn agent_handoff_tool(agent: &AgentDefinition) -> ToolDescriptor {
        ToolDescriptor::handoff(agent.id.clone(), agent.description.clone())
    }

    /// Append a return-to-root tool to `target`.
    ///
    /// Returns `false` and leaves `target` untouched when it is the root itself
    /// or already has a tool named `root_id`.
    pub fn inject(root_id: &str, target: &mut AgentDefinition) -> bool {
        if target.id == root_id {
            return false;
        }
        if target.tools.iter().any(|t| t.name == root_id) {
            debug!(agent = %target.id, root = %root_id, "Return-to-root tool already present");
            return false;
        }
        target.tools.push(Self::return_to_root_tool(root_id));
        debug!(agent = %target.id, root = %root_id, "Injected return-to-root tool");
        true
    }
}
