//! Minimal canopy example: a versioned JSON API with scoped auth and health checks.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/healthz
//!   curl http://localhost:3000/api/v1/users/42
//!   curl -H 'authorization: Bearer demo' http://localhost:3000/api/v1/users/42
//!   curl -X POST http://localhost:3000/api/v1/users \
//!        -H 'authorization: Bearer demo' \
//!        -d '{"name":"alice"}'
//!   curl 'http://localhost:3000/api/v1/search?q=alice&limit=5'

use canopy::{Context, Error, Group, Next, Response, RouteTree, Server, ServerConfig, health, middleware};
use http::StatusCode;
use serde_json::{Value, json};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = match std::env::var("CANOPY_CONFIG") {
        Ok(path) => ServerConfig::load(path)?,
        Err(_) => ServerConfig::default(),
    };

    let tree = RouteTree::new()
        .middleware(middleware::trace)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
        .group(
            Group::new("/api/v1")
                .get("/search", search)
                .group(
                    Group::new("/users")
                        .middleware(require_bearer)
                        .get("/:id", get_user)
                        .post("", create_user)
                        .delete("/:id", delete_user),
                ),
        );

    Server::from_config(&config).serve(tree).await
}

// Short-circuits with 401 unless a bearer token is present.
async fn require_bearer(ctx: Context, next: Next) -> Result<(), Error> {
    let authorized = ctx
        .header("authorization")
        .is_some_and(|v| v.starts_with("Bearer "));
    if !authorized {
        ctx.send(
            Response::builder()
                .status(StatusCode::UNAUTHORIZED)
                .header("www-authenticate", "Bearer")
                .json(r#"{"error":"Unauthorized"}"#),
        );
        return Ok(());
    }
    next.run(ctx).await
}

// GET /api/v1/search?q=…&limit=…
async fn search(ctx: Context) -> Value {
    json!({
        "q": ctx.query("q").unwrap_or_default(),
        "limit": ctx.query("limit").and_then(|l| l.parse::<u32>().ok()).unwrap_or(10),
        "results": [],
    })
}

// GET /api/v1/users/:id
async fn get_user(ctx: Context) -> Result<Value, Error> {
    let id = ctx.param("id").unwrap_or_default().parse::<u64>().map_err(Error::handler)?;
    Ok(json!({ "id": id, "name": "alice" }))
}

// POST /api/v1/users → 201, echoing the decoded body.
async fn create_user(ctx: Context) -> Result<Response, Error> {
    let Some(input) = ctx.body() else {
        return Ok(Response::status(StatusCode::BAD_REQUEST));
    };
    let mut user = json!({ "id": "99" });
    if let (Some(user), Some(name)) = (user.as_object_mut(), input.get("name")) {
        user.insert("name".to_owned(), name.clone());
    }
    Ok(Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/api/v1/users/99")
        .json(serde_json::to_vec(&user)?))
}

// DELETE /api/v1/users/:id → 204 No Content
async fn delete_user(_ctx: Context) -> Response {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("cache-control", "no-store")
        .no_body()
}
