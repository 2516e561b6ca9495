//! Scripted contact-center conversation.
//!
//! Registers a billing agent, a sales agent and a greeter as root, then replays a
//! fixed list of tool calls and prints the realtime client event each one
//! produces. Pass a TOML config path as the first argument, or configure through
//! `SWITCHBOARD_*` environment variables.

use agent_switchboard::{
    config, tool_typed, AgentDefinition, AgentRegistry, BoxError, Switchboard, ToolCall,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, JsonSchema)]
struct CustomerArgs {
    /// Unique identifier for the customer
    #[serde(rename = "customerCode")]
    customer_code: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UpdatePaymentArgs {
    /// Unique identifier for the customer
    #[serde(rename = "customerCode")]
    customer_code: String,
    /// New payment method details (e.g. 'Visa ending in 1234')
    #[serde(rename = "paymentMethod")]
    payment_method: String,
}

#[derive(Debug, Serialize)]
struct BillingDetails {
    balance: f64,
    due_date: &'static str,
    latest_charges: &'static str,
}

#[derive(Debug, Serialize)]
struct Payment {
    date: &'static str,
    amount: f64,
    method: &'static str,
}

const GREETER_INSTRUCTIONS: &str = "You are a call center operator that responds to customer inquiries.
Keep sentences short and simple, suitable for a voice conversation. Speak {language}.

Your tasks are:
- Greet the Customer at first and ask how you can help.
- ALWAYS route the proper agent to handle ALL specific requests via function call. NEVER provide answers yourself.
- Check if the Customer has any additional questions. If not, close the conversation.";

const BILLING_INSTRUCTIONS: &str = "You are a billing representative who assists customers with their billing or payment inquiries.
Keep sentences short and simple, suitable for a voice conversation. Speak {language}.

Your tasks are:
- Provide billing details, such as current balance and recent charges.
- Provide payment history if requested.
- Support the customer in setting up or updating their payment method.";

const SALES_INSTRUCTIONS: &str = "You are a sales person that responds to customer inquiries. Speak {language}.
Fields starting with \"_\" are not to be shared with the Customer.

### PRODUCTS
- Mobile Internet: €10/month, 10GB data included, €1/GB after that. _SKU: INET_MOBILE
- All-in-One Bundle: €45/month, mobile and home internet. _SKU: INET_BUNDLE
- Home Internet: €30/month, unlimited data at 1Gbps. _SKU: INET_HOME";

fn build_registry(config: &config::SwitchboardConfig) -> agent_switchboard::Result<AgentRegistry> {
    let mut registry = AgentRegistry::new(config);

    let billing_details = tool_typed(
        "fetch_billing_details",
        "Retrieve the customer's current billing details (balance, due date, latest charges).",
        |args: CustomerArgs| async move {
            tracing::debug!(customer = %args.customer_code, "Fetching billing details");
            Ok::<_, BoxError>(BillingDetails {
                balance: 45.75,
                due_date: "2025-02-01",
                latest_charges: "Monthly service fee of €30, plus a €15 phone accessory charge, plus taxes and fees.",
            })
        },
    )?;
    let payment_history = tool_typed(
        "fetch_payment_history",
        "Retrieve the customer's recent payment history.",
        |_args: CustomerArgs| async move {
            Ok::<_, BoxError>(vec![
                Payment { date: "2024-12-20", amount: 50.00, method: "Credit Card" },
                Payment { date: "2024-11-20", amount: 30.00, method: "Credit Card" },
            ])
        },
    )?;
    let update_payment = tool_typed(
        "update_payment_method",
        "Updates the customer's stored payment method (e.g., new credit card).",
        |args: UpdatePaymentArgs| async move {
            Ok::<_, BoxError>(format!(
                "Payment method updated to {} for customer {}",
                args.payment_method, args.customer_code
            ))
        },
    )?;

    registry.register(
        AgentDefinition::new("billing", "Billing Assistant")
            .with_description(
                "Call this if the customer wants to discuss billing or payment inquiries, \
                 check outstanding balances, view payment history, or set up a new payment method.",
            )
            .with_instructions(BILLING_INSTRUCTIONS)
            .with_tools([billing_details, payment_history, update_payment]),
    )?;
    registry.register(
        AgentDefinition::new("sales", "Sales Assistant")
            .with_description(
                "Call this if you need to provide commercial information, like pricing or product details.",
            )
            .with_instructions(SALES_INSTRUCTIONS),
    )?;
    registry.register_root(
        AgentDefinition::new("greeter", "Greeter")
            .with_description(
                "Call this if you need to greet the Customer or close the conversation \
                 after the Customer's request has been resolved.",
            )
            .with_instructions(GREETER_INSTRUCTIONS),
    )?;

    Ok(registry)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => config::from_file(path)?,
        None => config::from_env(),
    };

    let registry = build_registry(&config)?;
    let switchboard = Switchboard::new(config, registry)?;
    let session = switchboard.open_session()?;

    println!("=== Contact center session {} ===\n", session.id());
    let setup = switchboard.initial_event(&session).await?;
    println!("{}\n", serde_json::to_string_pretty(&setup)?);

    let script = [
        ToolCall::from_arguments_json("billing", "", "call-1"),
        ToolCall::from_arguments_json(
            "fetch_billing_details",
            r#"{"customerCode": "C-1001"}"#,
            "call-2",
        ),
        ToolCall::from_arguments_json(
            "update_payment_method",
            r#"{"customerCode": "C-1001", "paymentMethod": "Visa ending in 1234"}"#,
            "call-3",
        ),
        ToolCall::from_arguments_json("list_products", "{}", "call-4"),
        ToolCall::from_arguments_json("sales", "{}", "call-5"),
        ToolCall::from_arguments_json("greeter", "{}", "call-6"),
    ];

    for call in script {
        let name = call.name.clone();
        let outcome = session.handle(call).await;
        let event = switchboard.render(&outcome);
        println!(
            "[{}] {} -> {}",
            session.active_agent().await,
            name,
            serde_json::to_string(&event)?
        );
    }

    Ok(())
}
