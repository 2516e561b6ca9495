//! Per-conversation routing state.
//!
//! A [`Session`] owns the id of the active agent for one live conversation. Each
//! tool call is routed against the active agent, and a directive switches the
//! active agent before the call returns. The active agent is locked for the
//! whole call, so calls on one session never overlap.
//!
//! Clones share state: a clone is a handle to the same conversation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::Mutex;
use tower::{BoxError, Service};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::Result;
use crate::router::{InvocationRouter, ReconfigurationDirective, RouteOutcome};
use crate::tool::{ToolCall, ToolDescriptor};

#[derive(Clone, Debug)]
pub struct Session {
    id: Uuid,
    router: InvocationRouter,
    active: Arc<Mutex<String>>,
}

impl Session {
    /// Start a session with `start_agent` (an id or the root alias) active.
    pub fn new(router: InvocationRouter, start_agent: &str) -> Result<Self> {
        let start = router.registry().get(start_agent)?.id.clone();
        let id = Uuid::new_v4();
        info!(session = %id, agent = %start, "Session started");
        Ok(Self {
            id,
            router,
            active: Arc::new(Mutex::new(start)),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn active_agent(&self) -> String {
        self.active.lock().await.clone()
    }

    /// Tools to advertise for the active agent.
    pub async fn current_surface(&self) -> Result<Vec<ToolDescriptor>> {
        let active = self.active.lock().await;
        self.router.registry().surface_for(&active)
    }

    /// Directive to apply when the live session is first configured.
    pub async fn initial_directive(&self) -> Result<ReconfigurationDirective> {
        let active = self.active.lock().await;
        self.router.directive_for(&active)
    }

    /// Route one tool call and apply any agent switch it causes.
    #[instrument(skip_all, fields(session = %self.id, tool = %call.name))]
    pub async fn handle(&self, call: ToolCall) -> RouteOutcome {
        let mut active = self.active.lock().await;
        let outcome = self.router.route(&active, &call).await;
        if let RouteOutcome::Reconfigure(directive) = &outcome {
            info!(from = %*active, to = %directive.agent_id, "Active agent changed");
            *active = directive.agent_id.clone();
        }
        outcome
    }
}

impl Service<ToolCall> for Session {
    type Response = RouteOutcome;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        // Calls are serialized on the active-agent lock inside `call`.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, call: ToolCall) -> Self::Future {
        let session = self.clone();
        Box::pin(async move { Ok(session.handle(call).await) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentDefinition;
    use crate::registry::AgentRegistry;
    use crate::tool::empty_parameters;
    use tower::ServiceExt;

    fn router() -> InvocationRouter {
        let mut registry = AgentRegistry::default();
        registry
            .register(
                AgentDefinition::new("billing", "Billing")
                    .with_description("Billing")
                    .with_tool(ToolDescriptor::function(
                        "fetch_billing_details",
                        "Fetch",
                        empty_parameters(),
                        |_| Ok(serde_json::json!({"balance": 45.75})),
                    )),
            )
            .unwrap();
        registry
            .register_root(
                AgentDefinition::new("greeter", "Greeter")
                    .with_instructions("Greet the customer in {language}"),
            )
            .unwrap();
        InvocationRouter::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn starts_at_root_alias() {
        let session = Session::new(router(), "root").unwrap();
        assert_eq!(session.active_agent().await, "greeter");
        let directive = session.initial_directive().await.unwrap();
        assert_eq!(directive.instructions, "Greet the customer in English");
        assert_eq!(directive.tools.len(), 1);
    }

    #[tokio::test]
    async fn unknown_start_agent_fails() {
        assert!(Session::new(router(), "nobody").is_err());
    }

    #[tokio::test]
    async fn directive_switches_active_agent() {
        let session = Session::new(router(), "root").unwrap();

        let outcome = session
            .handle(ToolCall::new("billing", serde_json::json!({}), "c1"))
            .await;
        assert!(outcome.directive().is_some());
        assert_eq!(session.active_agent().await, "billing");

        let outcome = session
            .handle(ToolCall::new("fetch_billing_details", serde_json::json!({}), "c2"))
            .await;
        assert_eq!(outcome.envelope().unwrap().call_id, "c2");
        assert_eq!(session.active_agent().await, "billing");

        session
            .handle(ToolCall::new("greeter", serde_json::json!({}), "c3"))
            .await;
        assert_eq!(session.active_agent().await, "greeter");
    }

    #[tokio::test]
    async fn failures_keep_the_active_agent() {
        let session = Session::new(router(), "billing").unwrap();
        let outcome = session
            .handle(ToolCall::new("unknown_tool", serde_json::json!({}), "c"))
            .await;
        assert!(outcome.failure().is_some());
        assert_eq!(session.active_agent().await, "billing");
    }

    #[tokio::test]
    async fn sessions_do_not_share_active_agent() {
        let router = router();
        let a = Session::new(router.clone(), "root").unwrap();
        let b = Session::new(router, "root").unwrap();
        a.handle(ToolCall::new("billing", serde_json::json!({}), "c"))
            .await;
        assert_eq!(a.active_agent().await, "billing");
        assert_eq!(b.active_agent().await, "greeter");
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn works_as_tower_service() {
        let session = Session::new(router(), "root").unwrap();
        let outcome = session
            .clone()
            .oneshot(ToolCall::new("billing", serde_json::json!({}), "c"))
            .await
            .unwrap();
        assert_eq!(outcome.directive().unwrap().agent_id, "billing");
        assert_eq!(session.active_agent().await, "billing");
    }
}
