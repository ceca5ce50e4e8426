//! Tool handler seam
//!
//! A [`ToolHandler`] is the capability behind one action type. The
//! registry that maps action types to handlers lives in infrastructure;
//! this trait is the domain-side contract handlers must satisfy.

use async_trait::async_trait;

use crate::plan::Action;
use super::value_objects::ToolResult;

/// One registered tool: the handler for a single action `tool` string.
///
/// Handlers are the only place side effects are allowed in the whole
/// core. They must treat each invocation as one atomic attempt and
/// report failure through [`ToolResult`], never by panicking.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The action `tool` string this handler serves, e.g. `run_command`.
    fn name(&self) -> &str;

    /// Human-readable description for registry listings.
    fn description(&self) -> &str;

    /// Execute one action. The action's `tool` matches [`Self::name`].
    async fn execute(&self, action: &Action) -> ToolResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::AdvisorId;
    use crate::tool::ToolError;

    struct EchoHandler;

    #[async_trait]
    impl ToolHandler for EchoHandler {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the 'text' param back"
        }

        async fn execute(&self, action: &Action) -> ToolResult {
            match action.require_string("text") {
                Ok(text) => ToolResult::success("echo", text),
                Err(e) => ToolResult::failure("echo", ToolError::invalid_argument(e)),
            }
        }
    }

    #[tokio::test]
    async fn test_handler_contract() {
        let handler = EchoHandler;
        let action = Action::new(AdvisorId::Logic, "echo", "say hi").with_param("text", "hi");
        let result = handler.execute(&action).await;
        assert!(result.is_success());
        assert_eq!(result.output(), Some("hi"));
    }

    #[tokio::test]
    async fn test_handler_reports_bad_params() {
        let handler = EchoHandler;
        let action = Action::new(AdvisorId::Logic, "echo", "say nothing");
        let result = handler.execute(&action).await;
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }
}
