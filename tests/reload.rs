//! Route table hot reload.

mod common;

use std::time::Duration;

use common::{config, resources, route, spawn_server, TestServer};

async fn wait_for_status(server: &TestServer, path: &str, status: u16) {
    for _ in 0..50 {
        let resp = reqwest::get(server.url(path)).await.unwrap();
        if resp.status() == status {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("{path} never returned {status}");
}

#[tokio::test]
async fn test_new_routes_are_served_after_reload() {
    let server = spawn_server(
        config(vec![route("users", "/users", &["/{id}"], "users")]),
        resources(),
    )
    .await;

    assert_eq!(reqwest::get(server.url("/people/1")).await.unwrap().status(), 404);

    server
        .config_tx
        .send(config(vec![route("people", "/people", &["/{id}"], "users")]))
        .unwrap();

    wait_for_status(&server, "/people/1", 200).await;
    assert_eq!(reqwest::get(server.url("/users/1")).await.unwrap().status(), 404);

    server.stop().await;
}

#[tokio::test]
async fn test_failed_reload_keeps_current_routes() {
    let server = spawn_server(
        config(vec![route("users", "/users", &["/{id}"], "users")]),
        resources(),
    )
    .await;

    server
        .config_tx
        .send(config(vec![route("ghost", "/ghost", &[], "missing")]))
        .unwrap();
    // A valid reload queued after the bad one proves the bad one was processed.
    server
        .config_tx
        .send(config(vec![
            route("users", "/users", &["/{id}"], "users"),
            route("silent", "/silent", &[], "silent"),
        ]))
        .unwrap();

    wait_for_status(&server, "/silent", 204).await;
    assert_eq!(reqwest::get(server.url("/users/3")).await.unwrap().status(), 200);
    assert_eq!(reqwest::get(server.url("/ghost")).await.unwrap().status(), 404);

    server.stop().await;
}

#[tokio::test]
async fn test_state_reload_reports_route_count() {
    let server = rest_binder::HttpServer::new(config(vec![]), resources()).unwrap();
    assert!(server.state().routes().is_empty());

    let count = server
        .state()
        .reload(&config(vec![route("users", "/users", &["/{id}"], "users")]))
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(server.state().routes().len(), 1);

    assert!(server
        .state()
        .reload(&config(vec![route("bad", "/bad", &["/{a}/{a}"], "users")]))
        .is_err());
    assert_eq!(server.state().routes().len(), 1);
}
