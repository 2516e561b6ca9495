//! Tool surface builder.
//!
//! The surface of an agent is the complete list of functions advertised to the
//! model while that agent is active: its own tools first, then one handoff tool
//! per other registered agent. It is derived from the registry on every call.

use async_openai::types::ChatCompletionTool;

use crate::error::Result;
use crate::handoff::HandoffInjector;
use crate::registry::AgentRegistry;
use crate::tool::{ToolDescriptor, ToolSpec};

impl AgentRegistry {
    /// Tools advertised while `agent_id` (or the root alias) is active.
    ///
    /// Other agents appear in registration order. An agent that the requesting
    /// agent already hands off to through its own tools is not repeated.
    pub fn surface_for(&self, agent_id: &str) -> Result<Vec<ToolDescriptor>> {
        let agent = self.get(agent_id)?;
        let mut surface = agent.tools.clone();
        surface.extend(
            self.agents()
                .filter(|other| other.id != agent.id && !agent.hands_off_to(&other.id))
                .map(HandoffInjector::agent_handoff_tool),
        );
        Ok(surface)
    }

    /// Advertised specs for [`surface_for`](Self::surface_for).
    pub fn tool_specs_for(&self, agent_id: &str) -> Result<Vec<ToolSpec>> {
        Ok(self
            .surface_for(agent_id)?
            .iter()
            .map(ToolDescriptor::spec)
            .collect())
    }

    /// The surface as OpenAI chat-completion tools.
    pub fn openai_tools_for(&self, agent_id: &str) -> Result<Vec<ChatCompletionTool>> {
        self.surface_for(agent_id)?
            .iter()
            .map(ToolDescriptor::to_openai_tool)
            .collect()
    }
}
