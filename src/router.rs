//! Invocation router.
//!
//! Given the active agent and a tool call from the model, the router decides
//! between two things:
//!
//! 1. The name is a registered agent id (or the root alias): produce a
//!    [`ReconfigurationDirective`] carrying that agent's instructions and tool
//!    surface. No handler runs.
//! 2. The name is one of the active agent's own tools: run its handler and wrap
//!    the output in a [`ToolResultEnvelope`].
//!
//! Agent ids are checked first. Anything else is `ToolNotFound`.
//!
//! [`InvocationRouter::try_route`] returns errors as `Err`;
//! [`InvocationRouter::route`] folds them into [`RouteOutcome::Failed`] so one
//! bad call never tears down a session.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::SwitchboardConfig;
use crate::error::{Result, SwitchboardError};
use crate::registry::AgentRegistry;
use crate::tool::{ToolCall, ToolDescriptor, ToolKind, ToolSpec};

/// Instructions and tools the live session must adopt on an agent switch.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconfigurationDirective {
    /// Canonical id of the agent taking over.
    pub agent_id: String,
    pub instructions: String,
    pub tools: Vec<ToolDescriptor>,
}

impl ReconfigurationDirective {
    pub fn tool_specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(ToolDescriptor::spec).collect()
    }
}

/// A tool's output tied back to the call that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResultEnvelope {
    pub call_id: String,
    pub output: Value,
}

/// A routing error reported to the session instead of being raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteFailure {
    pub call_id: String,
    pub tool_name: String,
    /// Stable error code, see [`SwitchboardError::code`].
    pub code: &'static str,
    pub message: String,
}

impl RouteFailure {
    pub fn new(call: &ToolCall, error: &SwitchboardError) -> Self {
        Self {
            call_id: call.call_id.clone(),
            tool_name: call.name.clone(),
            code: error.code(),
            message: error.to_string(),
        }
    }
}

/// Successful routing result.
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    Reconfigure(ReconfigurationDirective),
    ToolResult(ToolResultEnvelope),
}

/// Routing result with failures folded in.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Reconfigure(ReconfigurationDirective),
    ToolResult(ToolResultEnvelope),
    Failed(RouteFailure),
}

impl RouteOutcome {
    pub fn directive(&self) -> Option<&ReconfigurationDirective> {
        match self {
            RouteOutcome::Reconfigure(d) => Some(d),
            _ => None,
        }
    }

    pub fn envelope(&self) -> Option<&ToolResultEnvelope> {
        match self {
            RouteOutcome::ToolResult(e) => Some(e),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&RouteFailure> {
        match self {
            RouteOutcome::Failed(f) => Some(f),
            _ => None,
        }
    }
}

impl From<Routed> for RouteOutcome {
    fn from(routed: Routed) -> Self {
        match routed {
            Routed::Reconfigure(d) => RouteOutcome::Reconfigure(d),
            Routed::ToolResult(e) => RouteOutcome::ToolResult(e),
        }
    }
}

/// Routes tool calls against a shared, read-only registry.
#[derive(Clone, Debug)]
pub struct InvocationRouter {
    registry: Arc<AgentRegistry>,
    tool_timeout: Option<Duration>,
}

impl InvocationRouter {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        if !registry.is_sealed() {
            warn!("Router created before a root agent was registered");
        }
        Self {
            registry,
            tool_timeout: None,
        }
    }

    pub fn from_config(registry: Arc<AgentRegistry>, config: &SwitchboardConfig) -> Self {
        Self::new(registry).with_tool_timeout(config.tool_timeout())
    }

    /// Bound every handler call; `None` leaves handlers unbounded.
    pub fn with_tool_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    /// Directive that makes `agent_id` the active agent.
    pub fn directive_for(&self, agent_id: &str) -> Result<ReconfigurationDirective> {
        let agent = self.registry.get(agent_id)?;
        Ok(ReconfigurationDirective {
            agent_id: agent.id.clone(),
            instructions: agent.instructions.clone(),
            tools: self.registry.surface_for(&agent.id)?,
        })
    }

    /// Route `call` for the session whose active agent is `active_agent`.
    #[instrument(skip(self, call), fields(tool = %call.name, call_id = %call.call_id))]
    pub async fn try_route(&self, active_agent: &str, call: &ToolCall) -> Result<Routed> {
        if self.registry.contains(&call.name) {
            let directive = self.directive_for(&call.name)?;
            info!(from = %active_agent, to = %directive.agent_id, "Switching agent");
            return Ok(Routed::Reconfigure(directive));
        }

        let agent = self.registry.get(active_agent)?;
        let tool = agent
            .tool(&call.name)
            .ok_or_else(|| SwitchboardError::ToolNotFound {
                name: call.name.clone(),
                agent: agent.id.clone(),
            })?;

        let handler = match &tool.kind {
            ToolKind::Function(handler) => handler.clone(),
            ToolKind::Handoff { target } => {
                let directive = self.directive_for(target)?;
                info!(from = %active_agent, to = %directive.agent_id, "Switching agent");
                return Ok(Routed::Reconfigure(directive));
            }
        };

        debug!(parameters = %call.parameters, "Executing tool");
        let fut = handler.call(call.parameters.clone());
        let result = match self.tool_timeout {
            Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
                SwitchboardError::HandlerTimeout {
                    tool: call.name.clone(),
                    timeout_ms: limit.as_millis(),
                }
            })?,
            None => fut.await,
        };
        let output = result.map_err(|source| SwitchboardError::HandlerExecution {
            tool: call.name.clone(),
            source,
        })?;
        debug!(output = %output, "Tool returned");

        Ok(Routed::ToolResult(ToolResultEnvelope {
            call_id: call.call_id.clone(),
            output,
        }))
    }

    /// Like [`try_route`](Self::try_route), with errors returned as
    /// [`RouteOutcome::Failed`].
    pub async fn route(&self, active_agent: &str, call: &ToolCall) -> RouteOutcome {
        match self.try_route(active_agent, call).await {
            Ok(routed) => routed.into(),
            Err(e) => {
                warn!(tool = %call.name, call_id = %call.call_id, code = e.code(), error = %e, "Tool call failed");
                RouteOutcome::Failed(RouteFailure::new(call, &e))
            }
        }
    }
}
