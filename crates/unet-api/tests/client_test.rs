#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use unet_api::{
    ApiClient, CreateTaskRequest, DeviceStatus, Error, EventFilters, EventQuery, EventStatus,
    TaskPriority, TriggerSource,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

async fn signed_in() -> (MockServer, ApiClient) {
    let (server, client) = setup().await;
    client.set_token(SecretString::from("tok-123".to_owned()));
    (server, client)
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_owned())
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "username": "admin", "password": "admin123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "abc",
            "role": "admin",
            "displayName": "系统管理员",
            "permissions": ["dashboard:view", "tasks:create"]
        })))
        .mount(&server)
        .await;

    let login = client.login("admin", &secret("admin123")).await.unwrap();

    assert_eq!(login.token, "abc");
    assert_eq!(login.display_name, "系统管理员");
    assert_eq!(login.permissions.len(), 2);
    assert!(!client.has_token(), "login must not adopt the token by itself");
}

#[tokio::test]
async fn test_login_failure_uses_detail() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "用户名或密码错误" })),
        )
        .mount(&server)
        .await;

    let result = client.login("admin", &secret("nope")).await;

    match result {
        Err(Error::Authentication { message }) => assert_eq!(message, "用户名或密码错误"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_login_failure_without_detail_is_generic() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.login("admin", &secret("x")).await;

    match result {
        Err(Error::Authentication { message }) => assert_eq!(message, "登录失败"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_authorized_call_without_token_never_hits_network() {
    let (server, client) = setup().await;

    let result = client.list_devices().await;

    assert!(matches!(result, Err(Error::NotAuthenticated)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bearer_header_is_attached() {
    let (server, client) = signed_in().await;

    Mock::given(method("GET"))
        .and(path("/api/alerts"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "alertId": "ALM-01",
            "deviceId": "DRY-02",
            "severity": "critical",
            "message": "干燥温度过高",
            "raisedAt": "2024-06-15T10:30:00Z",
            "acknowledged": false
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let alerts = client.list_alerts().await.unwrap();

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert_id, "ALM-01");
    assert!(!alerts[0].acknowledged);
}

#[tokio::test]
async fn test_401_is_session_expired() {
    let (server, client) = signed_in().await;

    Mock::given(method("GET"))
        .and(path("/api/integrations"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "认证已失效，请重新登录" })),
        )
        .mount(&server)
        .await;

    let result = client.list_integrations().await;

    assert!(matches!(result, Err(Error::SessionExpired)));
}

// ── Error extraction tests ──────────────────────────────────────────

#[tokio::test]
async fn test_api_error_prefers_detail() {
    let (server, client) = signed_in().await;

    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({ "detail": "权限不足", "message": "ignored" })),
        )
        .mount(&server)
        .await;

    let result = client.list_tasks().await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "权限不足");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_api_error_falls_back_to_message() {
    let (server, client) = signed_in().await;

    Mock::given(method("GET"))
        .and(path("/api/audit/logs"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({ "message": "slow down" })),
        )
        .mount(&server)
        .await;

    let result = client.list_audit_logs().await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 429);
            assert_eq!(message, "slow down");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_api_error_falls_back_to_status_text() {
    let (server, client) = signed_in().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/overview"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>upstream</html>"))
        .mount(&server)
        .await;

    let result = client.dashboard_overview().await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = signed_in().await;

    Mock::given(method("GET"))
        .and(path("/api/monitoring/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.list_devices().await;

    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Dashboard tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_overview() {
    let (server, client) = signed_in().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/overview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "activeTasks": 4,
            "completedToday": 18,
            "equipmentOnline": 8,
            "alarmCount": 2,
            "throughput": 1280.5,
            "energyUsage": 342.7,
            "lastUpdated": "2024-06-15T10:30:00Z",
            "materialSummary": [
                {
                    "materialCode": "PA66-GF30",
                    "hopper": "H-01",
                    "throughput": 320.4,
                    "trend": -1.2
                }
            ]
        })))
        .mount(&server)
        .await;

    let overview = client.dashboard_overview().await.unwrap();

    assert_eq!(overview.active_tasks, Some(4));
    assert_eq!(overview.throughput, Some(1280.5));
    assert_eq!(overview.material_summary.len(), 1);
    assert_eq!(overview.material_summary[0].trend, Some(-1.2));
}

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = signed_in().await;

    Mock::given(method("GET"))
        .and(path("/api/monitoring/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "deviceId": "DRY-01",
            "name": "干燥机 1#",
            "status": "maintenance",
            "material": "PA66-GF30",
            "temperature": 78.3,
            "level": 64,
            "lastHeartbeat": "2024-06-15T10:29:55Z",
            "throughput": 0.0,
            "alarms": ["露点偏高"]
        }])))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].status, Some(DeviceStatus::Maintenance));
    assert_eq!(devices[0].level, Some(64));
    assert_eq!(devices[0].alarms, vec!["露点偏高".to_owned()]);
}

// ── Task tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_task_posts_camel_case_body() {
    let (server, client) = signed_in().await;

    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(body_json(json!({
            "materialCode": "PP-H",
            "targetDevice": "MIX-02",
            "quantity": 250,
            "priority": "high",
            "source": "Manual"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "taskId": "TASK-1009",
            "materialCode": "PP-H",
            "targetDevice": "MIX-02",
            "quantity": 250,
            "priority": "high",
            "status": "queued",
            "progress": 0,
            "scheduledAt": "2024-06-15T10:30:00Z",
            "updatedAt": "2024-06-15T10:30:00Z",
            "source": "Manual"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CreateTaskRequest::new("PP-H", "MIX-02", 250).with_priority(TaskPriority::High);
    let task = client.create_task(&request).await.unwrap();

    assert_eq!(task.task_id, "TASK-1009");
    assert_eq!(task.priority, Some(TaskPriority::High));
}

// ── Interface4 tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_events_sends_paging_and_filters() {
    let (server, client) = signed_in().await;

    Mock::given(method("GET"))
        .and(path("/api/interface4/events"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "10"))
        .and(query_param("keyword", "PA66"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": 41,
                "eventId": "EVT-20240615-0041",
                "deviceId": "DRY-01",
                "pointCode": "ns=2;s=Dryer1.Output",
                "materialCode": "PA66-GF30",
                "batchNo": "B240615-03",
                "producedQty": 12.5,
                "unit": "kg",
                "status": "captured",
                "handler": "接口监听",
                "triggerSource": "OPC_UA",
                "triggeredAt": "2024-06-15T10:30:00Z"
            }],
            "total": 25,
            "page": 2,
            "pageSize": 10
        })))
        .mount(&server)
        .await;

    let query = EventQuery {
        page: 2,
        page_size: 10,
        filters: EventFilters {
            keyword: "PA66".into(),
            ..EventFilters::default()
        },
    };
    let page = client.list_events(&query).await.unwrap();

    assert_eq!(page.total, Some(25));
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].status, Some(EventStatus::Captured));
    assert_eq!(page.items[0].trigger_source, Some(TriggerSource::OpcUa));

    let requests = server.received_requests().await.unwrap();
    let url = &requests[0].url;
    assert!(url.query_pairs().all(|(k, _)| k != "status" && k != "start" && k != "end"));
}

#[tokio::test]
async fn test_export_uses_filters_without_paging() {
    let (server, client) = signed_in().await;

    Mock::given(method("GET"))
        .and(path("/api/interface4/events/export"))
        .and(query_param("status", "failed"))
        .and(query_param("start", "2024-06-01"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/csv")
                .set_body_string("eventId,status\nEVT-1,failed\n"),
        )
        .mount(&server)
        .await;

    let filters = EventFilters {
        status: "failed".into(),
        start: "2024-06-01".into(),
        ..EventFilters::default()
    };
    let bytes = client.export_events(&filters).await.unwrap();

    assert_eq!(&bytes[..], b"eventId,status\nEVT-1,failed\n");

    let requests = server.received_requests().await.unwrap();
    let keys: Vec<String> = requests[0]
        .url
        .query_pairs()
        .map(|(k, _)| k.into_owned())
        .collect();
    assert_eq!(keys, vec!["status".to_owned(), "start".to_owned()]);
}

#[tokio::test]
async fn test_export_without_filters_has_no_query() {
    let (server, client) = signed_in().await;

    Mock::given(method("GET"))
        .and(path("/api/interface4/events/export"))
        .respond_with(ResponseTemplate::new(200).set_body_string("eventId\n"))
        .mount(&server)
        .await;

    client.export_events(&EventFilters::default()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}
