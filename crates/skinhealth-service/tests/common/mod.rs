#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use skinhealth_service::build_router;
use skinhealth_service_shared::AppState;

pub fn server(state: AppState) -> TestServer {
    TestServer::new(build_router(state, "/metrics")).expect("failed to start test server")
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind upstream");
    let addr = listener.local_addr().expect("upstream has no address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("upstream crashed");
    });
    format!("http://{}", addr)
}
