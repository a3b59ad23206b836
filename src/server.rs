//! HTTP server and graceful shutdown.
//!
//! # Graceful shutdown and Kubernetes
//!
//! When Kubernetes terminates a pod it sends **SIGTERM** and waits
//! `terminationGracePeriodSeconds` (default 30 s) before sending SIGKILL.
//!
//! The server reacts by:
//! 1. Immediately stopping `listener.accept()`; no new connections are made.
//! 2. Letting every in-flight connection task run to completion, bounded by
//!    [`ServerConfig::shutdown_grace_secs`] when set.
//! 3. Returning from [`Server::serve`], which lets `main` exit cleanly.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::dispatch::dispatch;
use crate::error::Error;
use crate::tree::RouteTree;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
    shutdown_grace: Option<Duration>,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// ```rust,no_run
    /// use canopy::Server;
    /// let server = Server::bind(([0, 0, 0, 0], 3000).into());
    /// ```
    pub fn bind(addr: SocketAddr) -> Self {
        Self { addr, shutdown_grace: None }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self { addr: config.addr, shutdown_grace: config.shutdown_grace() }
    }

    /// Starts accepting connections and dispatching them through `tree`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, tree: RouteTree) -> Result<(), Error> {
        self.serve_with_shutdown(tree, shutdown_signal()).await
    }

    /// Like [`serve`](Server::serve), but stops when `signal` resolves.
    pub async fn serve_with_shutdown<S>(self, tree: RouteTree, signal: S) -> Result<(), Error>
    where
        S: Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.addr).await?;
        let tree = Arc::new(tree);

        info!(addr = %listener.local_addr()?, "canopy listening");

        let mut tasks = JoinSet::new();

        tokio::pin!(signal);

        loop {
            tokio::select! {
                // Shutdown first, so a SIGTERM stops accepting even while
                // more connections are queued.
                biased;

                () = &mut signal => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let tree = Arc::clone(&tree);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // Called once per request on the connection.
                        let svc = service_fn(move |req| {
                            let tree = Arc::clone(&tree);
                            async move {
                                let res = dispatch(&tree, req).await;
                                Ok::<_, std::convert::Infallible>(res.into_http())
                            }
                        });

                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not grow
                // without bound on long-running servers.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        drain(&mut tasks, self.shutdown_grace).await;

        info!("canopy stopped");
        Ok(())
    }
}

async fn drain(tasks: &mut JoinSet<()>, grace: Option<Duration>) {
    let all_done = async { while tasks.join_next().await.is_some() {} };
    let Some(grace) = grace else {
        all_done.await;
        return;
    };
    if tokio::time::timeout(grace, all_done).await.is_err() {
        warn!(remaining = tasks.len(), "shutdown grace period elapsed, aborting connections");
        tasks.shutdown().await;
    }
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both **SIGTERM** and **SIGINT** (Ctrl-C).
/// A listener that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
