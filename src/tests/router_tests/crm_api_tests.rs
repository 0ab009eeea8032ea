use crate::analytics::ConversionEvent;
use crate::db::leads::{get_lead, set_archived};
use crate::router::handle;
use crate::tests::utils::{body_json, body_string, empty_request, json_request, seed_lead, test_app};
use chrono::{Duration, Utc};
use http::Method;
use serde_json::json;

#[test]
fn listing_is_flat_last_updated_first_without_archived() {
    let t = test_app();
    let t0 = Utc::now();
    seed_lead(&t.app, "a", t0);
    seed_lead(&t.app, "b", t0 + Duration::seconds(1));
    seed_lead(&t.app, "c", t0 + Duration::seconds(2));
    t.app
        .db
        .with_conn(|conn| set_archived(conn, "c", true, t0 + Duration::seconds(3)))
        .unwrap();

    let resp = handle(empty_request(Method::GET, "/api/crm"), &t.app);
    assert_eq!(resp.status(), 200);

    let ids: Vec<String> = body_json(resp)
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn put_moves_lead_and_sets_note_and_value() {
    let t = test_app();
    seed_lead(&t.app, "a", Utc::now());

    let req = json_request(
        Method::PUT,
        "/api/crm",
        json!({ "leadId": "a", "nuevaEtapa": "seguimiento", "notas": "Llamar el lunes", "valor": "18000" }),
    );
    let resp = handle(req, &t.app);
    assert_eq!(resp.status(), 200);

    let body = body_json(resp);
    assert_eq!(body["success"], true);
    assert_eq!(body["lead"]["etapaCrm"], "seguimiento");
    assert_eq!(body["lead"]["notas"], "Llamar el lunes");
    assert_eq!(body["lead"]["valor"], 18000.0);
}

#[test]
fn put_is_idempotent_and_reports_won_once() {
    let t = test_app();
    seed_lead(&t.app, "a", Utc::now());

    for _ in 0..2 {
        let req = json_request(
            Method::PUT,
            "/api/crm",
            json!({ "leadId": "a", "nuevaEtapa": "ganado", "valor": 5000 }),
        );
        let resp = handle(req, &t.app);
        assert_eq!(resp.status(), 200);
        let lead = &body_json(resp)["lead"];
        assert_eq!(lead["etapaCrm"], "ganado");
        assert_eq!(lead["valor"], 5000.0);
    }

    let won: Vec<_> = t
        .reporter
        .events()
        .into_iter()
        .filter(|e| matches!(e, ConversionEvent::LeadWon { .. }))
        .collect();
    assert_eq!(won, vec![ConversionEvent::LeadWon { lead_id: "a".into() }]);
}

#[test]
fn put_validation_errors() {
    let t = test_app();
    seed_lead(&t.app, "a", Utc::now());

    let missing = handle(
        json_request(Method::PUT, "/api/crm", json!({ "leadId": "a" })),
        &t.app,
    );
    assert_eq!(missing.status(), 400);
    assert_eq!(body_json(missing)["error"], "leadId y nuevaEtapa son requeridos");

    let bad_stage = handle(
        json_request(Method::PUT, "/api/crm", json!({ "leadId": "a", "nuevaEtapa": "cerrado" })),
        &t.app,
    );
    assert_eq!(bad_stage.status(), 400);

    let bad_value = handle(
        json_request(
            Method::PUT,
            "/api/crm",
            json!({ "leadId": "a", "nuevaEtapa": "ganado", "valor": "mucho" }),
        ),
        &t.app,
    );
    assert_eq!(bad_value.status(), 400);
}

#[test]
fn put_unknown_lead_is_404() {
    let t = test_app();
    let resp = handle(
        json_request(Method::PUT, "/api/crm", json!({ "leadId": "ghost", "nuevaEtapa": "ganado" })),
        &t.app,
    );
    assert_eq!(resp.status(), 404);
    assert!(body_json(resp)["error"].is_string());
    assert!(t.reporter.events().is_empty());
}

#[test]
fn delete_then_delete_again() {
    let t = test_app();
    seed_lead(&t.app, "a", Utc::now());

    let first = handle(
        json_request(Method::DELETE, "/api/crm", json!({ "leadId": "a" })),
        &t.app,
    );
    assert_eq!(first.status(), 200);
    let body = body_json(first);
    assert_eq!(body["success"], true);
    assert!(body["message"].is_string());

    let second = handle(
        json_request(Method::DELETE, "/api/crm", json!({ "leadId": "a" })),
        &t.app,
    );
    assert_eq!(second.status(), 404);
    assert!(body_json(second)["error"].is_string());
}

#[test]
fn put_rejects_non_finite_values() {
    let t = test_app();
    seed_lead(&t.app, "a", Utc::now());

    for raw in [json!("inf"), json!("NaN"), json!("-infinity"), json!(" inf ")] {
        let resp = handle(
            json_request(
                Method::PUT,
                "/api/crm",
                json!({ "leadId": "a", "nuevaEtapa": "ganado", "valor": raw }),
            ),
            &t.app,
        );
        assert_eq!(resp.status(), 400, "valor {raw} should be refused");
        assert!(body_json(resp)["error"]
            .as_str()
            .unwrap()
            .starts_with("valor inválido"));
    }

    let stored = t
        .app
        .db
        .with_conn(|conn| get_lead(conn, "a"))
        .unwrap()
        .unwrap();
    assert_eq!(stored.value, None);
    assert_eq!(stored.stage.id(), "entrante");
    assert!(t.reporter.events().is_empty());

    let page = body_string(handle(empty_request(Method::GET, "/crm"), &t.app));
    assert!(!page.contains("$inf"));
}

#[test]
fn patch_archives_and_restores() {
    let t = test_app();
    seed_lead(&t.app, "a", Utc::now());

    let resp = handle(
        json_request(Method::PATCH, "/api/crm", json!({ "leadId": "a", "archivado": true })),
        &t.app,
    );
    assert_eq!(resp.status(), 200);
    let body = body_json(resp);
    assert_eq!(body["success"], true);
    assert_eq!(body["lead"]["archivado"], true);

    let listed = body_json(handle(empty_request(Method::GET, "/api/crm"), &t.app));
    assert!(listed.as_array().unwrap().is_empty());

    let resp = handle(
        json_request(Method::PATCH, "/api/crm", json!({ "leadId": "a", "archivado": false })),
        &t.app,
    );
    assert_eq!(resp.status(), 200);
    let listed = body_json(handle(empty_request(Method::GET, "/api/crm"), &t.app));
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[test]
fn patch_validation_and_unknown_lead() {
    let t = test_app();

    let missing = handle(
        json_request(Method::PATCH, "/api/crm", json!({ "leadId": "a" })),
        &t.app,
    );
    assert_eq!(missing.status(), 400);

    let unknown = handle(
        json_request(Method::PATCH, "/api/crm", json!({ "leadId": "ghost", "archivado": true })),
        &t.app,
    );
    assert_eq!(unknown.status(), 404);
    assert!(body_json(unknown)["error"].is_string());
}
