//! Entry point tying configuration, a sealed registry and sessions together.

use std::sync::Arc;

use tracing::info;

use crate::config::SwitchboardConfig;
use crate::error::{Result, SwitchboardError};
use crate::realtime::ClientEvent;
use crate::registry::{AgentRegistry, ROOT_ALIAS};
use crate::router::{InvocationRouter, ReconfigurationDirective, RouteOutcome};
use crate::session::Session;

/// A configured, read-only set of agents ready to serve conversations.
///
/// ```rust,no_run
/// use agent_switchboard::{AgentDefinition, AgentRegistry, Switchboard, SwitchboardConfig};
///
/// # async fn demo() -> agent_switchboard::Result<()> {
/// let config = SwitchboardConfig::default();
/// let mut registry = AgentRegistry::new(&config);
/// registry.register(AgentDefinition::new("sales", "Sales").with_description("Pricing"))?;
/// registry.register_root(AgentDefinition::new("greeter", "Greeter"))?;
///
/// let switchboard = Switchboard::new(config, registry)?;
/// let session = switchboard.open_session()?;
/// let setup = switchboard.initial_event(&session).await?;
/// # let _ = setup;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Switchboard {
    config: SwitchboardConfig,
    router: InvocationRouter,
}

impl Switchboard {
    /// Fails with [`SwitchboardError::NoRootYet`] until a root agent is registered.
    pub fn new(config: SwitchboardConfig, registry: AgentRegistry) -> Result<Self> {
        if !registry.is_sealed() {
            return Err(SwitchboardError::NoRootYet);
        }
        info!(agents = registry.len(), "Switchboard ready");
        let router = InvocationRouter::from_config(Arc::new(registry), &config);
        Ok(Self { config, router })
    }

    pub fn config(&self) -> &SwitchboardConfig {
        &self.config
    }

    pub fn router(&self) -> &InvocationRouter {
        &self.router
    }

    pub fn registry(&self) -> &AgentRegistry {
        self.router.registry()
    }

    /// New conversation starting at the root agent.
    pub fn open_session(&self) -> Result<Session> {
        self.open_session_at(ROOT_ALIAS)
    }

    pub fn open_session_at(&self, agent_id: &str) -> Result<Session> {
        Session::new(self.router.clone(), agent_id)
    }

    pub fn directive_for(&self, agent_id: &str) -> Result<ReconfigurationDirective> {
        self.router.directive_for(agent_id)
    }

    /// `session.update` configuring the upstream for the session's active agent.
    pub async fn initial_event(&self, session: &Session) -> Result<ClientEvent> {
        let directive = session.initial_directive().await?;
        Ok(ClientEvent::session_update(
            &directive,
            self.config.turn_detection,
        ))
    }

    pub fn render(&self, outcome: &RouteOutcome) -> ClientEvent {
        ClientEvent::from_outcome(outcome, self.config.turn_detection)
    }
}
