use crate::analytics::{ConversionEvent, ConversionReporter};
use crate::db::leads::{self, StageUpdate};
use crate::db::Database;
use crate::domain::ids::new_lead_id;
use crate::domain::{ContactSubmission, Lead, PipelineStage};
use crate::errors::{ResultResp, ServerError};
use crate::pipeline::{HttpLeadService, Kanban, LeadBackend, StoreLeadService, TransitionOutcome};
use crate::responses::{html_response, json_error_response, json_response, redirect};
use crate::templates;
use astra::{Request, Response};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

const MAX_BODY_BYTES: u64 = 64 * 1024;

/// Everything a request handler needs, shared by all server workers.
pub struct App {
    pub db: Database,
    pub reporter: Arc<dyn ConversionReporter>,
    /// What the CRM board works on. Intake and the admin panel always use
    /// the local database.
    pub leads: LeadBackend,
}

impl App {
    pub fn new(db: Database, reporter: Arc<dyn ConversionReporter>) -> Self {
        let leads = LeadBackend::Local(StoreLeadService::new(db.clone()));
        Self {
            db,
            reporter,
            leads,
        }
    }

    /// Drive the board through another instance's JSON API.
    pub fn with_lead_api(mut self, service: HttpLeadService) -> Self {
        self.leads = LeadBackend::Remote(service);
        self
    }
}

/// Dispatch a request. API routes answer errors as JSON, pages as HTML.
pub fn handle(req: Request, app: &App) -> Response {
    let is_api = req.uri().path().starts_with("/api/");
    match route(req, app) {
        Ok(resp) => resp,
        Err(err) if is_api => json_error_response(err),
        Err(err) => templates::html_error_response(err),
    }
}

fn route(req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => html_response(templates::pages::home_page()),
        ("GET", "/gracias") => html_response(templates::pages::thanks_page()),
        ("POST", "/contact") => submit_contact_form(req, app),
        ("GET", "/admin") => admin_panel(app),

        ("POST", "/api/contact") => create_contact(req, app),
        ("GET", "/api/contact") => list_contacts(app),
        ("GET", "/api/crm") => list_pipeline(app),
        ("PUT", "/api/crm") => update_stage(req, app),
        ("DELETE", "/api/crm") => delete_lead(req, app),
        ("PATCH", "/api/crm") => archive_lead(req, app),

        ("GET", "/crm") => crm_board(app),
        ("POST", "/crm/drop") => crm_drop(req, app),
        ("GET", p) if p.starts_with("/crm/leads/") => crm_lead_detail(app, p),
        ("POST", p) if p.starts_with("/crm/leads/") => crm_lead_action(req, app, p),

        _ => Err(ServerError::NotFound),
    }
}

// ---------------------------------------------------------------------------
// Request helpers

fn read_body(req: Request) -> Result<Vec<u8>, ServerError> {
    let mut body = req.into_body();
    let mut buf = Vec::new();
    body.reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("unreadable body: {e}")))?;
    Ok(buf)
}

fn read_json<T: DeserializeOwned>(req: Request) -> Result<T, ServerError> {
    let body = read_body(req)?;
    serde_json::from_slice(&body).map_err(|e| ServerError::BadRequest(format!("JSON inválido: {e}")))
}

fn read_form(req: Request) -> Result<HashMap<String, String>, ServerError> {
    let body = read_body(req)?;
    Ok(url::form_urlencoded::parse(&body).into_owned().collect())
}

/// `valor` may arrive as a number or a numeric string. Only finite
/// amounts are accepted.
fn parse_value(raw: Option<&Value>) -> Result<Option<f64>, ServerError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| invalid_value(n)),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| invalid_value(s)),
        Some(other) => Err(invalid_value(other)),
    }
}

fn invalid_value(shown: impl std::fmt::Display) -> ServerError {
    ServerError::BadRequest(format!("valor inválido: {shown}"))
}

fn parse_stage(raw: &str) -> Result<PipelineStage, ServerError> {
    raw.parse::<PipelineStage>()
        .map_err(|_| ServerError::BadRequest(format!("Etapa inválida: {raw}")))
}

// ---------------------------------------------------------------------------
// Intake

fn create_lead(app: &App, submission: ContactSubmission) -> Result<Lead, ServerError> {
    let new = submission.validate().inspect_err(|_| {
        log::warn!("Intake rejected: missing required fields");
    })?;

    let id = new_lead_id();
    let lead = app
        .db
        .with_conn(|conn| leads::insert_lead(conn, &id, &new, Utc::now()))?;

    log::info!("Lead {} created from {}", lead.id, lead.location);
    app.reporter.report(&ConversionEvent::LeadSubmitted {
        lead_id: lead.id.clone(),
    });
    Ok(lead)
}

fn create_contact(req: Request, app: &App) -> ResultResp {
    let submission: ContactSubmission = read_json(req)?;
    let lead = create_lead(app, submission)?;

    json_response(
        201,
        &json!({ "message": "Formulario enviado exitosamente", "id": lead.id }),
    )
}

fn submit_contact_form(req: Request, app: &App) -> ResultResp {
    let mut form = read_form(req)?;
    let submission = ContactSubmission {
        name: form.remove("nombre"),
        business: form.remove("negocio"),
        location: form.remove("ubicacion"),
        monthly_volume: form.remove("cantidad"),
        intake_stage: form.remove("etapa"),
        whatsapp: form.remove("whatsapp"),
        email: form.remove("email"),
        comments: form.remove("comentarios"),
    };
    create_lead(app, submission)?;
    redirect("/gracias")
}

fn list_contacts(app: &App) -> ResultResp {
    let all = app.db.with_conn(|conn| leads::list_all_leads(conn))?;
    json_response(200, &all)
}

fn admin_panel(app: &App) -> ResultResp {
    let all = app.db.with_conn(|conn| leads::list_all_leads(conn))?;
    html_response(templates::pages::admin_page(&all))
}

// ---------------------------------------------------------------------------
// Lead store API

fn list_pipeline(app: &App) -> ResultResp {
    let pipeline = app.db.with_conn(|conn| leads::list_pipeline_leads(conn))?;
    json_response(200, &pipeline)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStageBody {
    lead_id: Option<String>,
    nueva_etapa: Option<String>,
    notas: Option<String>,
    valor: Option<Value>,
}

fn update_stage(req: Request, app: &App) -> ResultResp {
    let body: UpdateStageBody = read_json(req)?;

    let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let (Some(lead_id), Some(stage_raw)) = (present(body.lead_id), present(body.nueva_etapa)) else {
        return Err(ServerError::BadRequest(
            "leadId y nuevaEtapa son requeridos".into(),
        ));
    };
    let update = StageUpdate {
        stage: parse_stage(&stage_raw)?,
        note: body.notas,
        value: parse_value(body.valor.as_ref())?,
    };

    let (previous, lead) = app.db.with_conn(|conn| {
        let previous = leads::get_lead(conn, &lead_id)?.map(|l| l.stage);
        let lead = leads::update_stage(conn, &lead_id, &update, Utc::now())?;
        Ok((previous, lead))
    })?;

    let Some(lead) = lead else {
        log::warn!("Stage change for unknown lead {lead_id}");
        return Err(ServerError::NotFound);
    };

    log::info!("Lead {lead_id} stage set to {}", lead.stage);
    report_if_won(app, previous, &lead);
    json_response(200, &json!({ "success": true, "lead": lead }))
}

fn report_if_won(app: &App, previous: Option<PipelineStage>, lead: &Lead) {
    if lead.stage == PipelineStage::Won && previous != Some(PipelineStage::Won) {
        app.reporter.report(&ConversionEvent::LeadWon {
            lead_id: lead.id.clone(),
        });
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteBody {
    lead_id: Option<String>,
}

fn delete_lead(req: Request, app: &App) -> ResultResp {
    let body: DeleteBody = read_json(req)?;
    let lead_id = body
        .lead_id
        .ok_or_else(|| ServerError::BadRequest("leadId es requerido".into()))?;

    if !app.db.with_conn(|conn| leads::delete_lead(conn, &lead_id))? {
        return Err(ServerError::NotFound);
    }

    log::info!("Lead {lead_id} deleted");
    json_response(
        200,
        &json!({ "success": true, "message": "Lead eliminado exitosamente" }),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArchiveBody {
    lead_id: Option<String>,
    archivado: Option<bool>,
}

fn archive_lead(req: Request, app: &App) -> ResultResp {
    let body: ArchiveBody = read_json(req)?;
    let (Some(lead_id), Some(archived)) = (body.lead_id, body.archivado) else {
        return Err(ServerError::BadRequest(
            "leadId y archivado son requeridos".into(),
        ));
    };

    let lead = app.db.with_conn(|conn| {
        if !leads::set_archived(conn, &lead_id, archived, Utc::now())? {
            return Ok(None);
        }
        leads::get_lead(conn, &lead_id)
    })?;
    let Some(lead) = lead else {
        return Err(ServerError::NotFound);
    };

    log::info!("Lead {lead_id} archived={archived}");
    json_response(200, &json!({ "success": true, "lead": lead }))
}

// ---------------------------------------------------------------------------
// CRM board

fn kanban(app: &App) -> Result<Kanban<&LeadBackend>, ServerError> {
    let mut kanban = Kanban::new(&app.leads);
    kanban.load()?;
    Ok(kanban)
}

fn crm_board(app: &App) -> ResultResp {
    let kanban = kanban(app)?;
    html_response(templates::pages::crm_page(kanban.board()))
}

/// Log what became of a board move and report a local win. A remote
/// instance reports its own wins when it accepts the change.
fn settle_move(app: &App, lead_id: &str, previous: Option<PipelineStage>, outcome: TransitionOutcome) {
    match outcome {
        TransitionOutcome::Committed(lead) => {
            if !app.leads.is_remote() {
                report_if_won(app, previous, &lead);
            }
        }
        TransitionOutcome::Unchanged => {}
        TransitionOutcome::RolledBack(err) | TransitionOutcome::Reverted { error: err, .. } => {
            log::warn!("Board move of {lead_id} did not stick: {err}");
        }
    }
}

/// A card dropped on the board. `target` is whatever the pointer was over:
/// a column (stage id) or another card (lead id).
fn crm_drop(req: Request, app: &App) -> ResultResp {
    let form = read_form(req)?;
    let lead_id = form
        .get("leadId")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServerError::BadRequest("leadId es requerido".into()))?;
    let target = form
        .get("target")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty());

    let mut kanban = kanban(app)?;
    let previous = kanban.board().locate(lead_id);
    kanban.drag_start(lead_id);
    if let Some(lead) = kanban.drag().active_lead(kanban.board()) {
        log::debug!("Drop of {} ({lead_id}) on {target:?}", lead.name);
    }
    let outcome = kanban.drag_end(target);
    settle_move(app, lead_id, previous, outcome);
    redirect("/crm")
}

/// `/crm/leads/{id}`
fn crm_lead_detail(app: &App, path: &str) -> ResultResp {
    let lead_id = path.trim_start_matches("/crm/leads/");
    if lead_id.is_empty() || lead_id.contains('/') {
        return Err(ServerError::NotFound);
    }

    let kanban = kanban(app)?;
    let lead = kanban.board().get(lead_id).ok_or(ServerError::NotFound)?;
    html_response(templates::pages::lead_detail_page(lead))
}

/// `/crm/leads/{id}/{stage|archive|delete}`
fn crm_lead_action(req: Request, app: &App, path: &str) -> ResultResp {
    let rest = path.trim_start_matches("/crm/leads/");
    let Some((lead_id, action)) = rest.split_once('/') else {
        return Err(ServerError::NotFound);
    };
    let lead_id = lead_id.to_string();

    match action {
        "stage" => {
            let form = read_form(req)?;
            let raw = form
                .get("stage")
                .ok_or_else(|| ServerError::BadRequest("stage es requerido".into()))?;
            let to = parse_stage(raw)?;

            let mut kanban = kanban(app)?;
            let Some(previous) = kanban.board().locate(&lead_id) else {
                return Err(ServerError::NotFound);
            };

            let outcome = kanban.move_to(&lead_id, to);
            settle_move(app, &lead_id, Some(previous), outcome);
            redirect("/crm")
        }
        "archive" => {
            let mut kanban = kanban(app)?;
            kanban.archive(&lead_id)?;
            redirect("/crm")
        }
        "delete" => {
            let mut kanban = kanban(app)?;
            kanban.delete(&lead_id)?;
            redirect("/crm")
        }
        _ => Err(ServerError::NotFound),
    }
}
