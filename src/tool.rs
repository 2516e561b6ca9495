//! Tool descriptors and handlers
//!
//! A [`ToolDescriptor`] is what an agent advertises to the model: a name, a
//! description, a JSON schema for the parameters, and what happens when the
//! model calls it. Real tools carry a [`ToolHandler`]; handoff tools only name
//! the agent that takes over. The two are distinct [`ToolKind`] variants so the
//! router never has to guess.

use std::future::Future;
use std::sync::Arc;

use async_openai::types::{
    ChatCompletionTool, ChatCompletionToolArgs, ChatCompletionToolType, FunctionObjectArgs,
};
use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower::{BoxError, Service, ServiceExt};
use tracing::warn;

use crate::error::Result;

/// A callable backing a real tool.
///
/// Any `Fn(Value) -> impl Future<Output = Result<Value, BoxError>>` closure is a
/// handler.
pub trait ToolHandler: Send + Sync {
    fn call(&self, parameters: Value) -> BoxFuture<'static, std::result::Result<Value, BoxError>>;
}

impl<F, Fut> ToolHandler for F
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = std::result::Result<Value, BoxError>> + Send + 'static,
{
    fn call(&self, parameters: Value) -> BoxFuture<'static, std::result::Result<Value, BoxError>> {
        Box::pin((self)(parameters))
    }
}

/// What calling a tool does.
#[derive(Clone)]
pub enum ToolKind {
    /// Run a handler and return its output.
    Function(Arc<dyn ToolHandler>),
    /// Switch the session to another agent.
    Handoff { target: String },
}

impl ToolKind {
    pub fn is_handoff(&self) -> bool {
        matches!(self, ToolKind::Handoff { .. })
    }
}

impl std::fmt::Debug for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolKind::Function(_) => f.write_str("Function"),
            ToolKind::Handoff { target } => f.debug_struct("Handoff").field("target", target).finish(),
        }
    }
}

impl PartialEq for ToolKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ToolKind::Function(a), ToolKind::Function(b)) => Arc::ptr_eq(a, b),
            (ToolKind::Handoff { target: a }, ToolKind::Handoff { target: b }) => a == b,
            _ => false,
        }
    }
}

/// Definition of a tool: the spec advertised upstream plus its behavior.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters_schema: Value,
    pub kind: ToolKind,
}

/// Schema for tools that take no arguments.
pub fn empty_parameters() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {}
    })
}

impl ToolDescriptor {
    /// Create a tool from an async handler.
    pub fn from_handler<H>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters_schema: Value,
        handler: H,
    ) -> Self
    where
        H: ToolHandler + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_schema,
            kind: ToolKind::Function(Arc::new(handler)),
        }
    }

    /// Create a tool from a synchronous function of the JSON parameters.
    pub fn function<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters_schema: Value,
        function: F,
    ) -> Self
    where
        F: Fn(Value) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
    {
        let function = Arc::new(function);
        Self::from_handler(name, description, parameters_schema, move |params: Value| {
            let function = function.clone();
            async move { (function.as_ref())(params) }
        })
    }

    /// Create a tool backed by a Tower service.
    pub fn from_service<S>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters_schema: Value,
        service: S,
    ) -> Self
    where
        S: Service<Value, Response = Value, Error = BoxError> + Clone + Send + Sync + 'static,
        S::Future: Send + 'static,
    {
        Self::from_handler(name, description, parameters_schema, move |params: Value| {
            service.clone().oneshot(params)
        })
    }

    /// Create a handoff tool that switches the session to `target`.
    pub fn handoff(target: impl Into<String>, description: impl Into<String>) -> Self {
        let target = target.into();
        Self {
            name: target.clone(),
            description: description.into(),
            parameters_schema: empty_parameters(),
            kind: ToolKind::Handoff { target },
        }
    }

    pub fn is_handoff(&self) -> bool {
        self.kind.is_handoff()
    }

    /// The agent this tool hands off to, if it is a handoff tool.
    pub fn handoff_target(&self) -> Option<&str> {
        match &self.kind {
            ToolKind::Handoff { target } => Some(target),
            ToolKind::Function(_) => None,
        }
    }

    /// The function spec advertised to the model.
    pub fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters_schema.clone(),
        }
    }

    /// Convert this tool's function signature into an OpenAI ChatCompletionTool spec.
    pub fn to_openai_tool(&self) -> Result<ChatCompletionTool> {
        let func = FunctionObjectArgs::default()
            .name(self.name.clone())
            .description(self.description.clone())
            .parameters(self.parameters_schema.clone())
            .build()?;
        let tool = ChatCompletionToolArgs::default()
            .r#type(ChatCompletionToolType::Function)
            .function(func)
            .build()?;
        Ok(tool)
    }
}

/// Create a tool from a typed handler.
/// - `A` is the input args struct (Deserialize + JsonSchema)
/// - `R` is the output type (Serialize)
pub fn tool_typed<A, H, Fut, R>(
    name: impl Into<String>,
    description: impl Into<String>,
    handler: H,
) -> Result<ToolDescriptor>
where
    A: DeserializeOwned + JsonSchema + Send + 'static,
    R: Serialize + Send + 'static,
    H: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<R, BoxError>> + Send + 'static,
{
    let schema = schemars::schema_for!(A);
    let params_value = serde_json::to_value(schema.schema)?;
    let handler = Arc::new(handler);
    Ok(ToolDescriptor::from_handler(
        name,
        description,
        params_value,
        move |raw: Value| {
            let h = handler.clone();
            async move {
                let args: A = serde_json::from_value(raw)?;
                let out: R = (h.as_ref())(args).await?;
                Ok::<_, BoxError>(serde_json::to_value(out)?)
            }
        },
    ))
}

/// Advertised form of a tool: `{"type": "function", name, description, parameters}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "function")]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A tool invocation emitted by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool or agent name
    pub name: String,
    /// Arguments to pass to the tool
    pub parameters: Value,
    /// Id tying the result back to the invocation
    pub call_id: String,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, parameters: Value, call_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters,
            call_id: call_id.into(),
        }
    }

    /// Build a call from the raw JSON argument string sent by the model.
    ///
    /// Empty or unparsable arguments become an empty object.
    pub fn from_arguments_json(
        name: impl Into<String>,
        arguments: &str,
        call_id: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let parameters = if arguments.trim().is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(arguments).unwrap_or_else(|e| {
                warn!(tool = %name, error = %e, "Failed to parse tool arguments");
                serde_json::json!({})
            })
        };
        Self::new(name, parameters, call_id)
    }
}
