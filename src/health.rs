//! Built-in Kubernetes health-check handlers.
//!
//! | Probe | Question |
//! |---|---|
//! | **Liveness** | Is the process alive? Failure → restart. |
//! | **Readiness** | Can the pod serve traffic? Failure → pulled from load-balancer. |
//!
//! Mount them wherever the probes point, typically outside any
//! authentication group:
//!
//! ```rust,no_run
//! use canopy::{RouteTree, health};
//!
//! let tree = RouteTree::new()
//!     .get("/healthz", health::liveness)
//!     .get("/readyz", health::readiness);
//! ```

use serde_json::{Value, json};

use crate::context::Context;

/// Liveness probe. Always `{"status":"ok"}`: if the process can answer at
/// all, it is alive.
pub async fn liveness(_ctx: Context) -> Value {
    json!({ "status": "ok" })
}

/// Readiness probe (default implementation). Replace it with your own handler
/// if readiness depends on warm-up or downstream services.
pub async fn readiness(_ctx: Context) -> Value {
    json!({ "status": "ready" })
}
