#![allow(missing_docs)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use portal_api::PortalApi;
use portal_auth::{
    AuthContext, GuardDecision, LOGIN_ROUTE, LoginForm, PasswordChange, RouteLog, SESSION_TTL,
};
use portal_http::{HttpClient, HttpConfig, TokenSource};
use portal_model::{NoticeLevel, NoticeLog, Role, Session};
use portal_store::{ManualClock, MemoryBackend, SessionStore, Store};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves `body` to every request and records the raw requests.
async fn stub_server(body: Value) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let body = body.to_string();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let log = log.clone();
            let body = body.clone();
            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                log.lock().unwrap().push(request);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
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
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buffer.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buffer).to_string()
}

struct Harness {
    auth: AuthContext,
    sessions: Arc<SessionStore>,
    routes: Arc<RouteLog>,
    notices: Arc<NoticeLog>,
    clock: Arc<ManualClock>,
}

fn harness(base: &str) -> Harness {
    harness_with(base, Arc::new(MemoryBackend::new()), Arc::new(ManualClock::new(1_000_000)))
}

fn harness_with(base: &str, backend: Arc<MemoryBackend>, clock: Arc<ManualClock>) -> Harness {
    let sessions = Arc::new(SessionStore::new(Store::new(backend, clock.clone())));
    let tokens: Arc<dyn TokenSource> = sessions.clone();
    let http = HttpClient::new(HttpConfig::new(base), tokens).unwrap();
    let routes = Arc::new(RouteLog::new());
    let notices = Arc::new(NoticeLog::new());
    let auth = AuthContext::restore(
        sessions.clone(),
        PortalApi::new(http),
        routes.clone(),
        notices.clone(),
    );
    Harness {
        auth,
        sessions,
        routes,
        notices,
        clock,
    }
}

#[tokio::test]
async fn test_admin_login_lands_on_admin_route() {
    let (base, _) = stub_server(json!({"code": 200, "message": "ok", "data": {"token": "abc"}})).await;
    let mut h = harness(&base);

    assert!(h.auth.login(&LoginForm::new("admin", "x"), false).await);

    assert_eq!(h.routes.current().as_deref(), Some("/admin"));
    assert_eq!(h.sessions.token().as_deref(), Some("abc"));
    assert_eq!(h.sessions.auth_token().as_deref(), Some("abc"));
    assert_eq!(h.auth.role(), Some(Role::Admin));
    assert_eq!(h.auth.current_user().unwrap().user_id, "admin");
    assert_eq!(h.notices.last().unwrap().level, NoticeLevel::Success);
    assert!(h.auth.has_role(&[Role::Admin, Role::Reviewer]));
    assert!(!h.auth.has_role(&[Role::User]));
}

#[tokio::test]
async fn test_blank_credentials_never_reach_the_server() {
    let (base, seen) = stub_server(json!({"code": 200, "message": "ok", "data": {"token": "abc"}})).await;
    let mut h = harness(&base);

    assert!(!h.auth.login(&LoginForm::new("admin", ""), false).await);
    assert!(!h.auth.login(&LoginForm::new("  ", "x"), true).await);
    assert!(!h.auth.login(&LoginForm::new("admin", "   "), false).await);

    assert!(seen.lock().unwrap().is_empty());
    let notice = h.notices.last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(notice.message, "请输入账号和密码");
    assert!(h.routes.routes().is_empty());
}

#[tokio::test]
async fn test_rejected_login_reports_server_message() {
    let (base, _) = stub_server(json!({"code": 400, "message": "账号已停用"})).await;
    let mut h = harness(&base);

    assert!(!h.auth.login(&LoginForm::new("zhang", "secret"), false).await);
    assert_eq!(h.notices.last().unwrap().message, "账号已停用");
    assert!(!h.auth.is_logged_in());
    assert_eq!(h.sessions.token(), None);
}

#[tokio::test]
async fn test_unreachable_server_reports_generic_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let mut h = harness(&base);

    assert!(!h.auth.login(&LoginForm::new("admin", "x"), false).await);
    assert_eq!(h.notices.last().unwrap().message, "登录失败，请稍后再试");
}

#[tokio::test]
async fn test_session_expires_across_restart() {
    let (base, _) = stub_server(json!({"code": 0, "message": "ok", "data": {"token": "t1", "role": "reviewer"}})).await;
    let backend = Arc::new(MemoryBackend::new());
    let clock = Arc::new(ManualClock::new(0));

    let mut first = harness_with(&base, backend.clone(), clock.clone());
    assert!(first.auth.login(&LoginForm::new("li", "pw"), false).await);
    assert_eq!(first.routes.current().as_deref(), Some("/reviewer"));

    let restored = harness_with(&base, backend.clone(), clock.clone());
    assert_eq!(restored.auth.role(), Some(Role::Reviewer));

    first.clock.advance(SESSION_TTL + Duration::from_secs(1));
    let expired = harness_with(&base, backend, clock);
    assert!(!expired.auth.is_logged_in());
    assert_eq!(expired.sessions.user_id(), None);
    assert_eq!(expired.sessions.token(), None);
}

#[tokio::test]
async fn test_expired_session_stays_dead_after_live_read() {
    let (base, _) = stub_server(json!({"code": 200, "message": "ok", "data": {"token": "abc"}})).await;
    let backend = Arc::new(MemoryBackend::new());
    let clock = Arc::new(ManualClock::new(0));

    let mut live = harness_with(&base, backend.clone(), clock.clone());
    assert!(live.auth.login(&LoginForm::new("admin", "x"), false).await);
    assert!(live.auth.is_logged_in());

    live.clock.advance(SESSION_TTL + Duration::from_secs(1));
    assert!(!live.auth.is_logged_in());
    assert_eq!(live.auth.role(), None);
    assert_eq!(live.sessions.auth_token(), None);
    assert_eq!(live.sessions.token(), None);

    let restarted = harness_with(&base, backend, clock);
    assert!(!restarted.auth.is_logged_in());
    assert_eq!(restarted.auth.role(), None);
    assert_eq!(restarted.sessions.user_id(), None);
}

#[tokio::test]
async fn test_logout_is_local_first_then_remote() {
    let (base, seen) = stub_server(json!({"code": 0, "message": "ok"})).await;
    let mut h = harness(&base);
    h.sessions.save_session(
        &Session {
            user_id: "u1".into(),
            role: Role::User,
            token: "tok".into(),
            permissions: vec!["entry:edit".into()],
        },
        None,
    );
    h.auth = AuthContext::restore(
        h.sessions.clone(),
        h.auth.api().clone(),
        h.routes.clone(),
        h.notices.clone(),
    );
    assert!(h.auth.has_permission("entry:edit"));

    h.auth.logout_remote().await;

    assert!(!h.auth.is_logged_in());
    assert_eq!(h.sessions.user_id(), None);
    assert_eq!(h.routes.current().as_deref(), Some(LOGIN_ROUTE));
    assert_eq!(h.notices.last().unwrap().message, "已退出登录");
    let requests = seen.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("POST /users/logout/"));
    assert!(requests[0].ends_with(r#"{"token":"tok"}"#));
}

#[tokio::test]
async fn test_guard_and_password_change_use_session() {
    let (base, _) = stub_server(json!({"code": 0, "message": "ok", "data": {"token": "abc"}})).await;
    let mut h = harness(&base);

    assert_eq!(
        h.auth.guard("/user/info", &[Role::User]),
        GuardDecision::Login {
            redirect: "/user/info".into()
        }
    );
    assert!(h.auth.has_any_role(None));
    assert!(h.auth.has_any_role(Some(&[])));
    assert!(!h.auth.has_any_role(Some(&[Role::User])));

    h.auth.login(&LoginForm::new("student1", "pw"), true).await;
    assert_eq!(h.auth.role(), Some(Role::User));
    assert_eq!(h.auth.guard("/user/info", &[Role::User]), GuardDecision::Allow);
    assert_eq!(h.auth.guard("/admin/home", &[Role::Admin]), GuardDecision::Forbidden);

    let form = PasswordChange {
        old_password: "old".into(),
        new_password: "abc".into(),
        confirm_password: "abd".into(),
    };
    assert!(!h.auth.change_password(&form));
    assert_eq!(h.notices.last().unwrap().message, "两次输入的密码不一致");
    assert!(!h.auth.change_password(&PasswordChange::default()));
    assert_eq!(h.notices.last().unwrap().level, NoticeLevel::Warning);
}
