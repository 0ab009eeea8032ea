use crate::analytics::RecordingReporter;
use crate::db::leads::insert_lead;
use crate::db::{init_db, Database};
use crate::domain::{IntakeStage, Lead, NewLead};
use crate::router::App;
use astra::{Body, Request, Response};
use chrono::{DateTime, Utc};
use http::Method;
use serde_json::Value;
use std::io::Read;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestApp {
    pub app: App,
    pub reporter: Arc<RecordingReporter>,
    // keeps the database file alive for the test
    _dir: TempDir,
}

/// Fresh app on its own SQLite file, with a recording reporter.
pub fn test_app() -> TestApp {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("crm_test.sqlite3");
    let db = Database::new(path.to_string_lossy().to_string());
    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    let reporter = Arc::new(RecordingReporter::default());
    TestApp {
        app: App::new(db, reporter.clone()),
        reporter,
        _dir: dir,
    }
}

pub fn new_lead(id: &str) -> NewLead {
    NewLead {
        name: format!("Cliente {id}"),
        business: "Despensa".into(),
        location: "La Plata, Buenos Aires".into(),
        monthly_volume: None,
        intake_stage: IntakeStage::StartingSoon,
        whatsapp: "221 555 0101".into(),
        email: Some(format!("{id}@example.com")),
        comments: None,
    }
}

pub fn seed_lead(app: &App, id: &str, at: DateTime<Utc>) -> Lead {
    insert(app, id, &new_lead(id), at)
}

pub fn insert(app: &App, id: &str, new: &NewLead, at: DateTime<Utc>) -> Lead {
    app.db
        .with_conn(|conn| insert_lead(conn, id, new, at))
        .expect("seed lead")
}

pub fn empty_request(method: Method, uri: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form_request(uri: &str, body: &str) -> Request {
    http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body.as_bytes().to_vec()))
        .unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn body_json(resp: Response) -> Value {
    serde_json::from_str(&body_string(resp)).expect("response is JSON")
}
