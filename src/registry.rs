//! Agent definition store.
//!
//! Registration happens in two phases: any number of [`register`] calls for the
//! specialized agents, then exactly one [`register_root`] call. Registering the
//! root gives every earlier agent a way back to it and seals the registry, after
//! which it is read-only and can be shared across sessions behind an `Arc`.
//!
//! ```rust
//! use agent_switchboard::{AgentDefinition, AgentRegistry, SwitchboardConfig};
//!
//! let mut registry = AgentRegistry::new(&SwitchboardConfig::default());
//! registry
//!     .register(AgentDefinition::new("Assistant_SalesAssistant", "Sales")
//!         .with_instructions("Answer in {language}."))
//!     .unwrap();
//! registry
//!     .register_root(AgentDefinition::new("Assistant_RootAssistant", "Greeter"))
//!     .unwrap();
//!
//! assert!(registry.is_sealed());
//! assert_eq!(registry.get("root").unwrap().id, "Assistant_RootAssistant");
//! assert_eq!(
//!     registry.get("Assistant_SalesAssistant").unwrap().instructions,
//!     "Answer in English."
//! );
//! ```
//!
//! [`register`]: AgentRegistry::register
//! [`register_root`]: AgentRegistry::register_root

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::agent::AgentDefinition;
use crate::config::SwitchboardConfig;
use crate::error::{Result, SwitchboardError};
use crate::handoff::HandoffInjector;
use crate::template::{self, TemplateParams};

/// Alias under which the root agent is also reachable.
pub const ROOT_ALIAS: &str = "root";

/// Agents keyed by id, in registration order.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    pub(crate) agents: Vec<AgentDefinition>,
    index: HashMap<String, usize>,
    root: Option<usize>,
    params: TemplateParams,
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new(&SwitchboardConfig::default())
    }
}

impl AgentRegistry {
    pub fn new(config: &SwitchboardConfig) -> Self {
        Self::with_params(config.template_params())
    }

    /// Create a registry that formats instructions with `params`.
    pub fn with_params(params: TemplateParams) -> Self {
        Self {
            agents: Vec::new(),
            index: HashMap::new(),
            root: None,
            params,
        }
    }

    /// Register a specialized (non-root) agent.
    pub fn register(&mut self, agent: AgentDefinition) -> Result<()> {
        if self.is_sealed() {
            return Err(SwitchboardError::RegistrySealed { id: agent.id });
        }
        let agent = self.prepare(agent)?;
        info!(agent = %agent.id, tools = agent.tools.len(), "Registered agent");
        self.insert(agent);
        Ok(())
    }

    /// Register the root agent and seal the registry.
    ///
    /// Every agent registered so far receives a tool that switches back to the
    /// root. The root is reachable under its own id and [`ROOT_ALIAS`].
    pub fn register_root(&mut self, agent: AgentDefinition) -> Result<()> {
        if let Some(existing) = self.root() {
            return Err(SwitchboardError::RootAlreadyRegistered {
                existing: existing.id.clone(),
            });
        }
        let agent = self.prepare(agent)?;
        self.check_handoff_targets(&agent)?;

        let mut injected = 0;
        for existing in self.agents.iter_mut() {
            if HandoffInjector::inject(&agent.id, existing) {
                injected += 1;
            }
        }

        info!(
            agent = %agent.id,
            tools = agent.tools.len(),
            handoffs_injected = injected,
            "Registered root agent; registry sealed"
        );
        let idx = self.insert(agent);
        self.root = Some(idx);
        Ok(())
    }

    /// Look up an agent by id or by [`ROOT_ALIAS`].
    pub fn get(&self, id: &str) -> Result<&AgentDefinition> {
        self.position(id).map(|idx| &self.agents[idx])
    }

    /// Whether `id` names a registered agent (the root alias included once a
    /// root exists).
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_ok()
    }

    pub fn root(&self) -> Option<&AgentDefinition> {
        self.root.map(|idx| &self.agents[idx])
    }

    /// True once the root agent has been registered.
    pub fn is_sealed(&self) -> bool {
        self.root.is_some()
    }

    /// Agents in registration order. The root alias is not repeated.
    pub fn agents(&self) -> impl Iterator<Item = &AgentDefinition> {
        self.agents.iter()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn params(&self) -> &TemplateParams {
        &self.params
    }

    fn position(&self, id: &str) -> Result<usize> {
        if id == ROOT_ALIAS {
            return self.root.ok_or(SwitchboardError::NoRootYet);
        }
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| SwitchboardError::AgentNotFound { id: id.to_string() })
    }

    fn insert(&mut self, agent: AgentDefinition) -> usize {
        let idx = self.agents.len();
        self.index.insert(agent.id.clone(), idx);
        self.agents.push(agent);
        idx
    }

    /// Validate names and format instructions. Nothing is stored on failure.
    fn prepare(&self, mut agent: AgentDefinition) -> Result<AgentDefinition> {
        self.validate(&agent)?;
        let missing: Vec<String> = template::placeholders(&agent.instructions)
            .into_iter()
            .filter(|name| !self.params.contains_key(name))
            .collect();
        if !missing.is_empty() {
            warn!(agent = %agent.id, ?missing, "Instructions reference unknown parameters");
        }
        agent.instructions = template::format(&agent.instructions, &self.params)?;
        debug!(agent = %agent.id, "Formatted agent instructions");
        Ok(agent)
    }

    fn validate(&self, agent: &AgentDefinition) -> Result<()> {
        if agent.id == ROOT_ALIAS {
            return Err(SwitchboardError::ReservedAgentId {
                id: agent.id.clone(),
            });
        }
        if self.index.contains_key(&agent.id) {
            return Err(SwitchboardError::DuplicateAgent {
                id: agent.id.clone(),
            });
        }

        let collision = |name: &str, owner: &str| SwitchboardError::NameCollision {
            name: name.to_string(),
            agent: owner.to_string(),
        };

        let mut seen = HashSet::new();
        for tool in &agent.tools {
            if !seen.insert(tool.name.as_str()) {
                return Err(collision(&tool.name, &agent.id));
            }
            if tool.name == ROOT_ALIAS || tool.name == agent.id {
                return Err(collision(&tool.name, &agent.id));
            }
            match tool.handoff_target() {
                // A handoff is advertised under its target's id and nothing else.
                Some(target) if target != tool.name => {
                    return Err(collision(&tool.name, &agent.id));
                }
                Some(_) => {}
                None if self.index.contains_key(&tool.name) => {
                    return Err(collision(&tool.name, &agent.id));
                }
                None => {}
            }
        }

        // Stored handoffs carry their target's name, so only function tools clash.
        if let Some(owner) = self
            .agents
            .iter()
            .find(|existing| existing.function_tools().any(|t| t.name == agent.id))
        {
            return Err(collision(&agent.id, &owner.id));
        }

        Ok(())
    }

    /// Every handoff stored so far, and those of `root`, must point at an agent
    /// that exists once `root` is in.
    fn check_handoff_targets(&self, root: &AgentDefinition) -> Result<()> {
        for agent in self.agents.iter().chain(std::iter::once(root)) {
            for target in agent.tools.iter().filter_map(|t| t.handoff_target()) {
                if target != root.id && !self.index.contains_key(target) {
                    return Err(SwitchboardError::AgentNotFound {
                        id: target.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
