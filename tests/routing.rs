//! End-to-end routing through a contact-center agent graph.

use std::sync::Arc;
use std::time::Duration;

use agent_switchboard::{
    tool_typed, AgentDefinition, AgentRegistry, ClientEvent, ConfigBuilder, ConversationItem,
    InvocationRouter, RouteOutcome, Routed, Switchboard, SwitchboardError, ToolCall,
    ToolDescriptor,
};
use pretty_assertions::assert_eq;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use tower::{BoxError, ServiceExt};

#[derive(Debug, Deserialize, JsonSchema)]
struct CustomerArgs {
    #[serde(rename = "customerCode")]
    customer_code: String,
}

fn registry() -> AgentRegistry {
    let config = ConfigBuilder::new().language("English").build();
    let mut registry = AgentRegistry::new(&config);

    let billing_details = tool_typed(
        "fetch_billing_details",
        "Retrieve billing details",
        |args: CustomerArgs| async move {
            Ok::<_, BoxError>(json!({"customer": args.customer_code, "balance": 45.75}))
        },
    )
    .unwrap();
    let slow = ToolDescriptor::from_handler(
        "slow_lookup",
        "Never answers in time",
        agent_switchboard::empty_parameters(),
        |_: serde_json::Value| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, BoxError>(json!(null))
        },
    );
    let failing = ToolDescriptor::function(
        "update_payment_method",
        "Update payment method",
        agent_switchboard::empty_parameters(),
        |_| Err("payment provider unavailable".into()),
    );

    registry
        .register(
            AgentDefinition::new("billing", "Billing")
                .with_description("Billing questions")
                .with_instructions("Billing desk. Speak {language}.")
                .with_tools([billing_details, slow, failing]),
        )
        .unwrap();
    registry
        .register(
            AgentDefinition::new("sales", "Sales")
                .with_description("Pricing questions")
                .with_instructions("Sales desk. Speak {language}."),
        )
        .unwrap();
    registry
        .register_root(
            AgentDefinition::new("greeter", "Greeter")
                .with_description("Greeting and closing")
                .with_instructions("Greet in {language}."),
        )
        .unwrap();
    registry
}

fn router() -> InvocationRouter {
    InvocationRouter::new(Arc::new(registry()))
}

#[tokio::test]
async fn agent_call_returns_directive_with_target_surface() {
    let router = router();
    let routed = router
        .try_route("greeter", &ToolCall::new("billing", json!({}), "call-1"))
        .await
        .unwrap();
    let Routed::Reconfigure(directive) = routed else {
        panic!("expected a directive");
    };
    assert_eq!(directive.agent_id, "billing");
    assert_eq!(directive.instructions, "Billing desk. Speak English.");
    assert_eq!(
        directive.tools,
        router.registry().surface_for("billing").unwrap()
    );
}

#[tokio::test]
async fn tool_call_returns_envelope_with_handler_output() {
    let outcome = router()
        .route(
            "billing",
            &ToolCall::new("fetch_billing_details", json!({"customerCode": "X"}), "call-2"),
        )
        .await;
    let envelope = outcome.envelope().expect("envelope");
    assert_eq!(envelope.call_id, "call-2");
    assert_eq!(envelope.output, json!({"customer": "X", "balance": 45.75}));
}

#[tokio::test]
async fn unknown_tool_is_reported_not_raised() {
    let router = router();
    let err = router
        .try_route("billing", &ToolCall::new("unknown_tool", json!({}), "call-3"))
        .await
        .unwrap_err();
    assert!(matches!(err, SwitchboardError::ToolNotFound { .. }));

    let outcome = router
        .route("billing", &ToolCall::new("unknown_tool", json!({}), "call-3"))
        .await;
    assert!(outcome.directive().is_none());
    assert!(outcome.envelope().is_none());
    let failure = outcome.failure().expect("failure");
    assert_eq!(failure.call_id, "call-3");
    assert_eq!(failure.code, "tool_not_found");
}

#[tokio::test]
async fn tools_of_other_agents_are_not_reachable() {
    let outcome = router()
        .route(
            "sales",
            &ToolCall::new("fetch_billing_details", json!({"customerCode": "X"}), "c"),
        )
        .await;
    assert_eq!(outcome.failure().unwrap().code, "tool_not_found");
}

#[tokio::test]
async fn bad_arguments_surface_as_handler_failure() {
    let outcome = router()
        .route(
            "billing",
            &ToolCall::from_arguments_json("fetch_billing_details", "not json", "c"),
        )
        .await;
    assert_eq!(outcome.failure().unwrap().code, "handler_execution");
}

#[tokio::test]
async fn handler_errors_become_failures() {
    let outcome = router()
        .route(
            "billing",
            &ToolCall::new("update_payment_method", json!({}), "c"),
        )
        .await;
    let failure = outcome.failure().unwrap();
    assert_eq!(failure.code, "handler_execution");
    assert!(failure.message.contains("update_payment_method"));
}

#[tokio::test]
async fn configured_timeout_bounds_handlers() {
    let router = router().with_tool_timeout(Some(Duration::from_millis(20)));
    let outcome = router
        .route("billing", &ToolCall::new("slow_lookup", json!({}), "c"))
        .await;
    assert_eq!(outcome.failure().unwrap().code, "handler_timeout");
}

#[tokio::test]
async fn return_to_root_switches_back() {
    let outcome = router()
        .route("sales", &ToolCall::new("root", json!({}), "c"))
        .await;
    assert_eq!(outcome.directive().unwrap().agent_id, "greeter");

    let outcome = router()
        .route("sales", &ToolCall::new("greeter", json!({}), "c"))
        .await;
    assert_eq!(outcome.directive().unwrap().agent_id, "greeter");
}

#[tokio::test]
async fn full_conversation_renders_realtime_events() {
    let config = ConfigBuilder::new().language("German").build();
    let mut registry = AgentRegistry::new(&config);
    registry
        .register(
            AgentDefinition::new("billing", "Billing")
                .with_description("Billing questions")
                .with_instructions("Speak {language}.")
                .with_tool(ToolDescriptor::function(
                    "fetch_billing_details",
                    "Fetch",
                    agent_switchboard::empty_parameters(),
                    |_| Ok(json!({"balance": 45.75})),
                )),
        )
        .unwrap();
    registry
        .register_root(AgentDefinition::new("greeter", "Greeter"))
        .unwrap();
    let switchboard = Switchboard::new(config, registry).unwrap();
    let session = switchboard.open_session().unwrap();

    let events: Vec<serde_json::Value> = {
        let mut out = Vec::new();
        for call in [
            ToolCall::new("billing", json!({}), "call-1"),
            ToolCall::new("fetch_billing_details", json!({}), "call-2"),
            ToolCall::new("unknown_tool", json!({}), "call-3"),
        ] {
            let outcome: RouteOutcome = session.clone().oneshot(call).await.unwrap();
            out.push(serde_json::to_value(switchboard.render(&outcome)).unwrap());
        }
        out
    };

    assert_eq!(events[0]["type"], "session.update");
    assert_eq!(events[0]["session"]["instructions"], "Speak German.");
    assert_eq!(events[0]["session"]["tools"][0]["name"], "fetch_billing_details");
    assert_eq!(events[0]["session"]["tools"][1]["name"], "greeter");

    assert_eq!(
        events[1],
        json!({
            "type": "conversation.item.create",
            "item": {
                "type": "function_call_output",
                "call_id": "call-2",
                "output": "{\"balance\":45.75}"
            }
        })
    );

    let rendered: ClientEvent = serde_json::from_value(events[2].clone()).unwrap();
    let ClientEvent::ConversationItemCreate {
        item: ConversationItem::FunctionCallOutput { call_id, output },
    } = rendered
    else {
        panic!("expected function_call_output");
    };
    assert_eq!(call_id, "call-3");
    assert!(output.contains("error"));
    assert_eq!(session.active_agent().await, "billing");
}
