use crate::analytics::ConversionEvent;
use crate::db::leads::{delete_lead, get_lead};
use crate::domain::PipelineStage;
use crate::errors::PipelineError;
use crate::pipeline::{HttpLeadService, Kanban, LeadService, TransitionOutcome};
use crate::router::{handle, App};
use crate::tests::utils::{body_string, empty_request, form_request, seed_lead, test_app, TestApp};
use astra::Server;
use chrono::{Duration, Utc};
use http::Method;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration as StdDuration;

fn free_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr")
}

/// Serve the test app on a background thread and return its base URL.
fn serve(t: &TestApp) -> String {
    let addr = free_addr();
    let app = App::new(t.app.db.clone(), t.app.reporter.clone());
    thread::spawn(move || {
        let _ = Server::bind(addr).serve(move |req, _info| handle(req, &app));
    });

    for _ in 0..100 {
        if TcpStream::connect(addr).is_ok() {
            break;
        }
        thread::sleep(StdDuration::from_millis(20));
    }
    format!("http://{addr}")
}

#[test]
fn drag_to_won_commits_through_the_api() {
    let t = test_app();
    let t0 = Utc::now();
    seed_lead(&t.app, "a", t0);
    seed_lead(&t.app, "b", t0 + Duration::seconds(1));

    let service = HttpLeadService::new(serve(&t));
    let mut kanban = Kanban::new(service);
    kanban.load().unwrap();
    assert_eq!(kanban.board().len(), 2);

    kanban.drag_start("a");
    let outcome = kanban.drag_end(Some("ganado"));
    assert!(outcome.is_committed(), "{outcome:?}");

    let fresh = kanban.service().list_leads().unwrap();
    let a = fresh.iter().find(|l| l.id == "a").unwrap();
    assert_eq!(a.stage, PipelineStage::Won);
    assert_eq!(kanban.board().bucket(PipelineStage::Won)[0].id, "a");
}

#[test]
fn lead_deleted_elsewhere_rolls_back_without_phantom_card() {
    let t = test_app();
    seed_lead(&t.app, "a", Utc::now());
    seed_lead(&t.app, "b", Utc::now());

    let mut kanban = Kanban::new(HttpLeadService::new(serve(&t)));
    kanban.load().unwrap();

    t.app.db.with_conn(|conn| delete_lead(conn, "a")).unwrap();

    let outcome = kanban.move_to("a", PipelineStage::FollowingUp);
    assert_eq!(
        outcome,
        TransitionOutcome::RolledBack(PipelineError::NotFound("a".into()))
    );
    assert_eq!(kanban.board().locate("a"), None);
    assert_eq!(kanban.board().len(), 1);
}

#[test]
fn unreachable_server_is_a_network_error() {
    let service = HttpLeadService::new(format!("http://{}", free_addr()));
    let err = service.list_leads().unwrap_err();
    assert!(matches!(err, PipelineError::Network(_)), "{err:?}");
}

#[test]
fn listing_404_is_a_rejection_not_a_missing_lead() {
    let t = test_app();
    let service = HttpLeadService::new(format!("{}/nope", serve(&t)));

    let err = service.list_leads().unwrap_err();
    assert!(
        matches!(err, PipelineError::Rejected { status: 404, .. }),
        "{err:?}"
    );
}

#[test]
fn board_driven_through_another_instance() {
    let central = test_app();
    seed_lead(&central.app, "a", Utc::now());
    seed_lead(&central.app, "b", Utc::now());

    // the desk has its own empty database; its board works on the central one
    let desk = test_app();
    let desk_app = App::new(desk.app.db.clone(), desk.app.reporter.clone())
        .with_lead_api(HttpLeadService::new(serve(&central)));

    let page = body_string(handle(empty_request(Method::GET, "/crm"), &desk_app));
    assert!(page.contains("Cliente a"));

    let resp = handle(form_request("/crm/drop", "leadId=a&target=ganado"), &desk_app);
    assert_eq!(resp.status(), 302);
    let a = central
        .app
        .db
        .with_conn(|conn| get_lead(conn, "a"))
        .unwrap()
        .unwrap();
    assert_eq!(a.stage, PipelineStage::Won);

    // the instance that accepted the change reports the win, once
    assert_eq!(
        central.reporter.events(),
        vec![ConversionEvent::LeadWon { lead_id: "a".into() }]
    );
    assert!(desk.reporter.events().is_empty());

    let resp = handle(form_request("/crm/leads/b/archive", ""), &desk_app);
    assert_eq!(resp.status(), 302);
    let b = central
        .app
        .db
        .with_conn(|conn| get_lead(conn, "b"))
        .unwrap()
        .unwrap();
    assert!(b.archived);

    let missing = handle(form_request("/crm/leads/ghost/delete", ""), &desk_app);
    assert_eq!(missing.status(), 404);
}
