//! Wire types exchanged with the gateway.

use serde::{Deserialize, Serialize};

/// Label key used to tag function Deployments and to find them again.
pub const FUNCTION_LABEL: &str = "function";

/// Port every function container listens on, and the port its Service exposes.
pub const FUNCTION_PORT: i32 = 8080;

/// Request body of a deploy call.
///
/// The gateway's create-function request calls the name `service`, so that
/// spelling is accepted too. Any other fields it sends are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSpec {
    #[serde(alias = "service")]
    pub name: String,
    pub image: String,
}

/// One entry of the function listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSummary {
    pub name: String,
    pub replica_count: u64,
    pub image: String,
    /// Always 0: invocations are counted by the gateway, not here.
    pub invocation_count: u64,
}
