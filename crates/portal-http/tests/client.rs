#![allow(missing_docs)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use portal_http::{HttpClient, HttpConfig, NoToken, RequestOptions, TokenSource, UnauthorizedPolicy};
use portal_store::SessionStore;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned reply of the stub server.
#[derive(Clone)]
struct Reply {
    status: &'static str,
    headers: Vec<(&'static str, &'static str)>,
    body: String,
    delay: Duration,
}

impl Reply {
    fn json(status: &'static str, body: serde_json::Value) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", "application/json")],
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    fn text(status: &'static str, body: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", "text/html")],
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }
}

/// Serves `reply` to every connection and records the raw requests.
async fn stub_server(reply: Reply) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let reply = reply.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                log.lock().unwrap().push(request);
                tokio::time::sleep(reply.delay).await;
                let mut response = format!("HTTP/1.1 {}\r\n", reply.status);
                for (name, value) in &reply.headers {
                    response.push_str(&format!("{name}: {value}\r\n"));
                }
                response.push_str(&format!(
                    "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    reply.body.len(),
                    reply.body
                ));
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{addr}"), seen)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buffer).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buffer.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buffer).to_string()
}

fn header_line<'a>(request: &'a str, name: &str) -> Option<&'a str> {
    request.lines().find(|line| {
        line.split_once(':')
            .is_some_and(|(n, _)| n.eq_ignore_ascii_case(name))
    })
}

fn session_with_token(token: &str) -> Arc<SessionStore> {
    let sessions = SessionStore::default();
    sessions.set_user_id("u1");
    sessions.set_role(portal_model::Role::User);
    sessions.set_auth_token(token, None);
    Arc::new(sessions)
}

#[tokio::test]
async fn test_envelope_passthrough_and_auth_header() {
    let (base, seen) = stub_server(Reply::json(
        "200 OK",
        json!({"code": 0, "message": "success", "data": {"id": 3}}),
    ))
    .await;
    let client = HttpClient::new(HttpConfig::new(&base), session_with_token("abc")).unwrap();

    let env = client
        .post("/artwork/", RequestOptions::new().body(json!({"title": "t"})))
        .await;
    assert_eq!(env.code, 0);
    assert_eq!(env.message, "success");
    assert_eq!(env.data, json!({"id": 3}));

    let requests = seen.lock().unwrap().clone();
    let request = &requests[0];
    assert!(request.starts_with("POST /artwork/ HTTP/1.1"));
    assert_eq!(header_line(request, "authorization"), Some("authorization: Token abc"));
    assert_eq!(
        header_line(request, "content-type"),
        Some("content-type: application/json")
    );
    assert!(request.ends_with(r#"{"title":"t"}"#));
}

#[tokio::test]
async fn test_caller_authorization_and_skip_auth() {
    let (base, seen) = stub_server(Reply::json("200 OK", json!([]))).await;
    let client = HttpClient::new(HttpConfig::new(&base), session_with_token("abc")).unwrap();

    client
        .get("/a", RequestOptions::new().header("Authorization", "Bearer zzz"))
        .await;
    client.get("/b", RequestOptions::new().skip_auth()).await;

    let requests = seen.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    let with_override = requests.iter().find(|r| r.starts_with("GET /a")).unwrap();
    assert_eq!(
        header_line(with_override, "authorization"),
        Some("authorization: Bearer zzz")
    );
    let skipped = requests.iter().find(|r| r.starts_with("GET /b")).unwrap();
    assert_eq!(header_line(skipped, "authorization"), None);
    assert_eq!(header_line(skipped, "content-type"), None);
}

#[tokio::test]
async fn test_bare_success_is_wrapped() {
    let (base, seen) = stub_server(Reply::json("201 Created", json!({"id": 9}))).await;
    let client = HttpClient::new(HttpConfig::new(&base), Arc::new(NoToken)).unwrap();

    let env = client
        .get(
            "/list/",
            RequestOptions::new().query("page", 1).query("q", serde_json::Value::Null),
        )
        .await;
    assert_eq!(env.code, 201);
    assert_eq!(env.message, "created");
    assert_eq!(env.data, json!({"id": 9}));
    assert!(seen.lock().unwrap()[0].starts_with("GET /list/?page=1 HTTP/1.1"));
}

#[tokio::test]
async fn test_redirect_is_unauthorized() {
    let mut reply = Reply::text("302 Found", "");
    reply.headers.push(("Location", "/accounts/login/"));
    let (base, seen) = stub_server(reply).await;
    let client = HttpClient::new(HttpConfig::new(&base), Arc::new(NoToken)).unwrap();

    let env = client.get("/users/info/", RequestOptions::new()).await;
    assert_eq!(env.code, 401);
    assert_eq!(env.message, "Unauthorized (Redirect)");
    // Not followed.
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unauthorized_clears_session_under_policy() {
    let (base, _seen) = stub_server(Reply::text("401 Unauthorized", "")).await;
    let sessions = session_with_token("abc");

    let warn_only = HttpClient::new(HttpConfig::new(&base), sessions.clone()).unwrap();
    let env = warn_only.get("/x", RequestOptions::new()).await;
    assert_eq!(env.code, 401);
    assert_eq!(env.message, "Unauthorized");
    assert!(sessions.is_logged_in());

    let clearing = HttpClient::new(
        HttpConfig::new(&base).unauthorized_policy(UnauthorizedPolicy::ClearSession),
        sessions.clone(),
    )
    .unwrap();
    clearing.get("/x", RequestOptions::new()).await;
    assert!(!sessions.is_logged_in());
    assert_eq!(TokenSource::token(sessions.as_ref()), None);
}

#[tokio::test]
async fn test_timeout_resolves_with_transport_code() {
    let mut reply = Reply::json("200 OK", json!({}));
    reply.delay = Duration::from_secs(5);
    let (base, _seen) = stub_server(reply).await;
    let client = HttpClient::new(HttpConfig::new(&base), Arc::new(NoToken)).unwrap();

    let env = client
        .get("/slow", RequestOptions::new().timeout(Duration::from_millis(50)))
        .await;
    assert_eq!(env.code, -1);
    assert_eq!(env.message, "request timed out after 50 ms");
}

#[tokio::test]
async fn test_connection_refused_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        HttpClient::new(HttpConfig::new(format!("http://{addr}")), Arc::new(NoToken)).unwrap();
    let env = client.delete("/x", RequestOptions::new()).await;
    assert_eq!(env.code, -1);
    assert!(!env.message.is_empty());
}

#[tokio::test]
async fn test_reason_phrase_for_other_statuses() {
    let (base, _seen) = stub_server(Reply::text("500 Internal Server Error", "boom")).await;
    let client = HttpClient::new(HttpConfig::new(&base), Arc::new(NoToken)).unwrap();
    let env = client.put("/x", RequestOptions::new().body(json!({}))).await;
    assert_eq!(env.code, 500);
    assert_eq!(env.message, "Internal Server Error");
}

#[tokio::test]
async fn test_download_and_tunnel_check() {
    let (base, _seen) = stub_server(Reply::text("200 OK", "file-bytes")).await;
    let client = HttpClient::new(HttpConfig::new(&base), Arc::new(NoToken)).unwrap();
    assert_eq!(client.download("/f").await.as_deref(), Some(&b"file-bytes"[..]));

    let status = client.check_tunnel("/").await;
    assert!(status.ok);
    assert_eq!(status.status, 200);

    let (base, _seen) =
        stub_server(Reply::text("404 Not Found", "Tunnel h7b.natappfree.cc not found")).await;
    let client = HttpClient::new(HttpConfig::new(&base), Arc::new(NoToken)).unwrap();
    assert_eq!(client.download("/f").await, None);
    let status = client.check_tunnel("/").await;
    assert!(!status.ok);
    assert_eq!(status.status, 404);
    assert_eq!(status.message, "Tunnel not found");
}
