use crate::analytics::ConversionEvent;
use crate::db::leads::get_lead;
use crate::domain::PipelineStage;
use crate::router::handle;
use crate::tests::utils::{
    body_string, empty_request, form_request, insert, new_lead, seed_lead, test_app,
};
use chrono::{Duration, Utc};
use http::Method;

#[test]
fn board_renders_columns_and_stats() {
    let t = test_app();
    let t0 = Utc::now();
    seed_lead(&t.app, "a", t0);
    seed_lead(&t.app, "b", t0 + Duration::seconds(1));

    let resp = handle(empty_request(Method::GET, "/crm"), &t.app);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    for stage in PipelineStage::ALL {
        assert!(body.contains(stage.title()), "missing column {}", stage.title());
    }
    assert!(body.contains("Cliente a"));
    assert!(body.contains("tel:+542215550101"));
    assert!(body.contains("mailto:a@example.com"));
    assert!(body.contains("tasa de conversión"));
}

#[test]
fn stage_form_moves_lead_and_redirects() {
    let t = test_app();
    seed_lead(&t.app, "a", Utc::now());

    let resp = handle(form_request("/crm/leads/a/stage", "stage=ganado"), &t.app);
    assert_eq!(resp.status(), 302);
    assert_eq!(resp.headers().get("Location").unwrap().to_str().unwrap(), "/crm");

    let lead = t
        .app
        .db
        .with_conn(|conn| get_lead(conn, "a"))
        .unwrap()
        .unwrap();
    assert_eq!(lead.stage, PipelineStage::Won);
    assert!(t
        .reporter
        .events()
        .contains(&ConversionEvent::LeadWon { lead_id: "a".into() }));
}

#[test]
fn stage_form_rejects_unknown_stage_and_lead() {
    let t = test_app();
    seed_lead(&t.app, "a", Utc::now());

    let bad = handle(form_request("/crm/leads/a/stage", "stage=cerrado"), &t.app);
    assert_eq!(bad.status(), 400);

    let missing = handle(form_request("/crm/leads/ghost/stage", "stage=ganado"), &t.app);
    assert_eq!(missing.status(), 404);
}

#[test]
fn archive_hides_lead_from_board() {
    let t = test_app();
    seed_lead(&t.app, "a", Utc::now());

    let resp = handle(form_request("/crm/leads/a/archive", ""), &t.app);
    assert_eq!(resp.status(), 302);

    let body = body_string(handle(empty_request(Method::GET, "/crm"), &t.app));
    assert!(!body.contains("Cliente a"));

    let lead = t.app.db.with_conn(|conn| get_lead(conn, "a")).unwrap();
    assert!(lead.is_some_and(|l| l.archived));
}

#[test]
fn delete_form_removes_lead_and_404s_after() {
    let t = test_app();
    seed_lead(&t.app, "a", Utc::now());

    let resp = handle(form_request("/crm/leads/a/delete", ""), &t.app);
    assert_eq!(resp.status(), 302);
    assert_eq!(t.app.db.with_conn(|conn| get_lead(conn, "a")).unwrap(), None);

    let again = handle(form_request("/crm/leads/a/delete", ""), &t.app);
    assert_eq!(again.status(), 404);
}

#[test]
fn archive_of_unknown_lead_is_404() {
    let t = test_app();
    seed_lead(&t.app, "a", Utc::now());

    let resp = handle(form_request("/crm/leads/ghost/archive", ""), &t.app);
    assert_eq!(resp.status(), 404);
    assert!(body_string(resp).contains("No encontrado"));
}

#[test]
fn drop_on_a_card_moves_lead_to_that_cards_column() {
    let t = test_app();
    let t0 = Utc::now();
    seed_lead(&t.app, "a", t0);
    seed_lead(&t.app, "b", t0 + Duration::seconds(1));
    handle(form_request("/crm/leads/b/stage", "stage=ganado"), &t.app);

    let resp = handle(form_request("/crm/drop", "leadId=a&target=b"), &t.app);
    assert_eq!(resp.status(), 302);
    assert_eq!(resp.headers().get("Location").unwrap().to_str().unwrap(), "/crm");

    let a = t.app.db.with_conn(|conn| get_lead(conn, "a")).unwrap().unwrap();
    assert_eq!(a.stage, PipelineStage::Won);

    let won: Vec<_> = t
        .reporter
        .events()
        .into_iter()
        .filter(|e| matches!(e, ConversionEvent::LeadWon { .. }))
        .collect();
    assert_eq!(won.len(), 2);
}

#[test]
fn drop_on_a_column_moves_lead() {
    let t = test_app();
    seed_lead(&t.app, "a", Utc::now());

    handle(form_request("/crm/drop", "leadId=a&target=seguimiento"), &t.app);

    let a = t.app.db.with_conn(|conn| get_lead(conn, "a")).unwrap().unwrap();
    assert_eq!(a.stage, PipelineStage::FollowingUp);
}

#[test]
fn drop_without_a_usable_target_leaves_the_store_alone() {
    let t = test_app();
    let t0 = Utc::now() - Duration::minutes(5);
    seed_lead(&t.app, "a", t0);
    let before = t.app.db.with_conn(|conn| get_lead(conn, "a")).unwrap().unwrap();

    for body in [
        "leadId=a&target=sidebar",
        "leadId=a&target=",
        "leadId=a",
        "leadId=a&target=entrante",
        "leadId=a&target=a",
        "leadId=ghost&target=ganado",
    ] {
        let resp = handle(form_request("/crm/drop", body), &t.app);
        assert_eq!(resp.status(), 302, "{body}");
    }

    let after = t.app.db.with_conn(|conn| get_lead(conn, "a")).unwrap().unwrap();
    assert_eq!(after, before);
    assert!(t.reporter.events().is_empty());
}

#[test]
fn drop_without_lead_id_is_400() {
    let t = test_app();
    let resp = handle(form_request("/crm/drop", "target=ganado"), &t.app);
    assert_eq!(resp.status(), 400);
}

#[test]
fn detail_page_shows_the_whole_lead_and_hosts_delete() {
    let t = test_app();
    let t0 = Utc::now();
    let mut new = new_lead("a");
    new.comments = Some("Abrimos una sucursal en marzo".into());
    insert(&t.app, "a", &new, t0);

    let board = body_string(handle(empty_request(Method::GET, "/crm"), &t.app));
    assert!(board.contains("href=\"/crm/leads/a\""));

    let resp = handle(empty_request(Method::GET, "/crm/leads/a"), &t.app);
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Abrimos una sucursal en marzo"));
    assert!(body.contains("a@example.com"));
    assert!(body.contains(&t0.format("%d/%m/%Y %H:%M").to_string()));
    assert!(body.contains("action=\"/crm/leads/a/delete\""));
    assert!(body.contains("action=\"/crm/leads/a/archive\""));
}

#[test]
fn detail_page_for_missing_or_archived_lead_is_404() {
    let t = test_app();
    seed_lead(&t.app, "a", Utc::now());
    handle(form_request("/crm/leads/a/archive", ""), &t.app);

    for uri in ["/crm/leads/a", "/crm/leads/ghost", "/crm/leads/"] {
        let resp = handle(empty_request(Method::GET, uri), &t.app);
        assert_eq!(resp.status(), 404, "{uri}");
    }
}
