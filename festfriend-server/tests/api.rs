use std::sync::Arc;

use festfriend_protocol::{
    Argon2Credentials, CredentialParams, CredentialScheme, GroupId, GroupRegistry, GroupService,
};
use festfriend_server::http::wire::{CreateGroupResponse, ErrorBody, MembersResponse, MessageResponse};
use festfriend_server::logging::setup_test_logging;
use festfriend_server::{GroupServer, RunningServer, ServerConfig};
use reqwest::StatusCode;
use serde_json::{json, Value};

struct TestServer {
    server: GroupServer,
    running: RunningServer,
    client: reqwest::Client,
}

impl TestServer {
    /// Server whose registry holds group 55 (password "password", member "alice").
    async fn seeded() -> Self {
        setup_test_logging();

        let credentials = Arc::new(Argon2Credentials::new(CredentialParams::insecure_fast()).unwrap());
        let registry = Arc::new(GroupRegistry::new());
        registry
            .create_group(GroupId(55), credentials.hash("password", GroupId(55)).unwrap())
            .unwrap();
        registry.append_member(GroupId(55), "alice").unwrap();

        let config = ServerConfig {
            port: 0,
            credential_params: CredentialParams::insecure_fast(),
            max_body_bytes: 1024,
            ..ServerConfig::default()
        };
        let server = GroupServer::with_service(config, GroupService::new(registry, credentials));
        let running = server.start().await.unwrap();

        Self {
            server,
            running,
            client: reqwest::Client::new(),
        }
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .post(format!("http://{}{}", self.running.local_addr(), path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn shutdown(self) {
        self.server.stop();
        self.running.wait().await.unwrap();
    }
}

fn detail(body: Value) -> String {
    serde_json::from_value::<ErrorBody>(body).unwrap().detail
}

#[tokio::test]
async fn test_join_group_ok() {
    let srv = TestServer::seeded().await;

    let (status, body) = srv
        .post("/join", json!({"username": "john", "password": "password", "groupID": 55}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_value::<MessageResponse>(body).unwrap(),
        MessageResponse::ok()
    );

    srv.shutdown().await;
}

#[tokio::test]
async fn test_join_group_not_found() {
    let srv = TestServer::seeded().await;

    let (status, body) = srv
        .post("/join", json!({"username": "john", "password": "password", "groupID": 65}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Group 65 not found!"}));

    srv.shutdown().await;
}

#[tokio::test]
async fn test_join_group_unauthorized() {
    let srv = TestServer::seeded().await;

    let (status, body) = srv
        .post("/join", json!({"username": "john", "password": "pswd", "groupID": 55}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(detail(body), "Wrong groupID or password!");

    srv.shutdown().await;
}

#[tokio::test]
async fn test_join_wrong_password_before_conflict() {
    let srv = TestServer::seeded().await;

    let (status, _) = srv
        .post("/join", json!({"username": "alice", "password": "pswd", "groupID": 55}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    srv.shutdown().await;
}

#[tokio::test]
async fn test_join_group_conflict() {
    let srv = TestServer::seeded().await;

    let (status, body) = srv
        .post("/join", json!({"username": "alice", "password": "password", "groupID": 55}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(detail(body), "alice already exists!");

    let (_, body) = srv
        .post("/group/members", json!({"password": "password", "groupID": 55}))
        .await;
    assert_eq!(body, json!({"members": ["alice"]}));

    srv.shutdown().await;
}

#[tokio::test]
async fn test_create_group() {
    let srv = TestServer::seeded().await;

    let (status, body) = srv.post("/group/create", json!({"password": "mypass"})).await;
    assert_eq!(status, StatusCode::OK);

    let created: CreateGroupResponse = serde_json::from_value(body).unwrap();
    assert_ne!(created.group_id, GroupId(55));

    let (status, body) = srv
        .post("/group/members", json!({"password": "mypass", "groupID": created.group_id}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"members": []}));

    srv.shutdown().await;
}

#[tokio::test]
async fn test_get_members() {
    let srv = TestServer::seeded().await;

    let (status, body) = srv
        .post("/group/members", json!({"password": "password", "groupID": 55}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_value::<MembersResponse>(body).unwrap().members,
        vec!["alice"]
    );

    srv.shutdown().await;
}

#[tokio::test]
async fn test_get_members_not_found() {
    let srv = TestServer::seeded().await;

    let (status, body) = srv
        .post("/group/members", json!({"password": "password", "groupID": 56}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(detail(body), "Group 56 not found!");

    srv.shutdown().await;
}

#[tokio::test]
async fn test_get_members_unauthorized() {
    let srv = TestServer::seeded().await;

    let (status, body) = srv
        .post("/group/members", json!({"password": "pswd", "groupID": 55}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(detail(body), "Wrong groupID or password!");

    srv.shutdown().await;
}

#[tokio::test]
async fn test_get_members_new_members() {
    let srv = TestServer::seeded().await;

    srv.post("/join", json!({"username": "john", "password": "password", "groupID": 55}))
        .await;
    let (status, body) = srv
        .post("/group/members", json!({"password": "password", "groupID": 55}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"members": ["alice", "john"]}));

    srv.shutdown().await;
}

#[tokio::test]
async fn test_full_scenario() {
    let srv = TestServer::seeded().await;

    let (_, body) = srv.post("/group/create", json!({"password": "mypass"})).await;
    let id = serde_json::from_value::<CreateGroupResponse>(body).unwrap().group_id;

    let (status, body) = srv
        .post("/join", json!({"groupID": id, "password": "mypass", "username": "alice"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "OK"}));

    let (status, body) = srv
        .post("/join", json!({"groupID": id, "password": "mypass", "username": "alice"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(detail(body), "alice already exists!");

    let (status, _) = srv
        .post("/group/members", json!({"groupID": id, "password": "wrongpass"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = srv
        .post("/group/members", json!({"groupID": id, "password": "mypass"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"members": ["alice"]}));

    srv.shutdown().await;
}

#[tokio::test]
async fn test_out_of_range_id_not_found() {
    let srv = TestServer::seeded().await;

    let (status, body) = srv
        .post("/join", json!({"groupID": 99999, "password": "x", "username": "y"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(detail(body), "Group 99999 not found!");

    srv.shutdown().await;
}

#[tokio::test]
async fn test_negative_id_is_normalized() {
    let srv = TestServer::seeded().await;

    // -65481 + 65536 = 55
    let (status, body) = srv
        .post("/group/members", json!({"groupID": -65481, "password": "password"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"members": ["alice"]}));

    let (status, body) = srv
        .post("/group/members", json!({"groupID": -13434, "password": "password"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(detail(body), "Group 52102 not found!");

    srv.shutdown().await;
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let srv = TestServer::seeded().await;

    let (status, body) = srv.post("/join", json!({"groupID": 55, "password": "password"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.get("detail").is_some());

    let (status, _) = srv
        .post("/group/members", json!({"groupID": "55", "password": "password"}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing reached the registry
    let (_, body) = srv
        .post("/group/members", json!({"password": "password", "groupID": 55}))
        .await;
    assert_eq!(body, json!({"members": ["alice"]}));

    srv.shutdown().await;
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let srv = TestServer::seeded().await;

    let (status, body) = srv
        .post("/group/create", json!({"password": "x".repeat(4096)}))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(detail(body), "Payload too large");
    assert_eq!(srv.server.service().registry().len(), 1);

    srv.shutdown().await;
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let srv = TestServer::seeded().await;
    let url = format!("http://{}/group/create", srv.running.local_addr());

    let requests: Vec<_> = (0..16)
        .map(|i| {
            let client = srv.client.clone();
            let url = url.clone();
            tokio::spawn(async move {
                let res = client
                    .post(url)
                    .json(&json!({"password": format!("pw{i}")}))
                    .send()
                    .await
                    .unwrap();
                res.json::<CreateGroupResponse>().await.unwrap().group_id
            })
        })
        .collect();

    let mut ids = std::collections::HashSet::new();
    for request in requests {
        assert!(ids.insert(request.await.unwrap()));
    }
    assert!(!ids.contains(&GroupId(55)));
    assert_eq!(srv.server.service().registry().len(), 17);

    srv.shutdown().await;
}
