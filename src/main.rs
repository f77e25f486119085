//! Run with:
//!   RUST_LOG=info cargo run -- --addr 127.0.0.1:8080
//!
//! Try:
//!   curl -X POST http://localhost:8080/api/v1/users \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"Ada","email":"ada@example.com","address":{"city":"London"}}'
//!   curl -H 'accept: application/xml' http://localhost:8080/api/v1/users/1
//!   curl 'http://localhost:8080/api/v1/user-action?action=get&id=1'
//!   open http://localhost:8080/swagger/index.html

use clap::Parser;
use userdeck::{AppState, Config, Server, Store, config, routes};

#[tokio::main]
async fn main() -> Result<(), userdeck::Error> {
    let config = Config::parse();
    config::init_tracing(&config.log);

    let state = AppState::new(Store::new(), config.action_policy());
    tracing::info!(policy = ?state.action_policy, "starting userdeck");

    Server::bind(config.addr).serve(routes(state)).await
}
