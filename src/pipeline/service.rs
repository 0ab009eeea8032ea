// src/pipeline/service.rs
//! The lead service the pipeline core talks to.
//!
//! Two implementations: [`StoreLeadService`] goes straight to SQLite;
//! [`HttpLeadService`] calls the JSON API of a running instance. The board
//! uses whichever one [`LeadBackend`] was configured with.

use crate::db::leads::{self, StageUpdate};
use crate::db::Database;
use crate::domain::{Lead, PipelineStage};
use crate::errors::PipelineError;
use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

pub trait LeadService {
    /// Pipeline leads (archived excluded), most recently updated first.
    fn list_leads(&self) -> Result<Vec<Lead>, PipelineError>;

    /// Must be idempotent for identical arguments.
    fn update_stage(
        &self,
        lead_id: &str,
        stage: PipelineStage,
        note: Option<&str>,
        value: Option<f64>,
    ) -> Result<Lead, PipelineError>;

    fn delete_lead(&self, lead_id: &str) -> Result<(), PipelineError>;

    /// Take a lead out of the pipeline without deleting it.
    fn archive_lead(&self, lead_id: &str) -> Result<(), PipelineError>;
}

impl<S: LeadService + ?Sized> LeadService for &S {
    fn list_leads(&self) -> Result<Vec<Lead>, PipelineError> {
        (**self).list_leads()
    }

    fn update_stage(
        &self,
        lead_id: &str,
        stage: PipelineStage,
        note: Option<&str>,
        value: Option<f64>,
    ) -> Result<Lead, PipelineError> {
        (**self).update_stage(lead_id, stage, note, value)
    }

    fn delete_lead(&self, lead_id: &str) -> Result<(), PipelineError> {
        (**self).delete_lead(lead_id)
    }

    fn archive_lead(&self, lead_id: &str) -> Result<(), PipelineError> {
        (**self).archive_lead(lead_id)
    }
}

/// Where the board reads and writes leads: this instance's database, or
/// the JSON API of another instance.
pub enum LeadBackend {
    Local(StoreLeadService),
    Remote(HttpLeadService),
}

impl LeadBackend {
    pub fn is_remote(&self) -> bool {
        matches!(self, LeadBackend::Remote(_))
    }

    fn service(&self) -> &dyn LeadService {
        match self {
            LeadBackend::Local(store) => store,
            LeadBackend::Remote(http) => http,
        }
    }
}

impl LeadService for LeadBackend {
    fn list_leads(&self) -> Result<Vec<Lead>, PipelineError> {
        self.service().list_leads()
    }

    fn update_stage(
        &self,
        lead_id: &str,
        stage: PipelineStage,
        note: Option<&str>,
        value: Option<f64>,
    ) -> Result<Lead, PipelineError> {
        self.service().update_stage(lead_id, stage, note, value)
    }

    fn delete_lead(&self, lead_id: &str) -> Result<(), PipelineError> {
        self.service().delete_lead(lead_id)
    }

    fn archive_lead(&self, lead_id: &str) -> Result<(), PipelineError> {
        self.service().archive_lead(lead_id)
    }
}

// ---------------------------------------------------------------------------
// SQLite

pub struct StoreLeadService {
    db: Database,
}

impl StoreLeadService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl LeadService for StoreLeadService {
    fn list_leads(&self) -> Result<Vec<Lead>, PipelineError> {
        Ok(self.db.with_conn(|conn| leads::list_pipeline_leads(conn))?)
    }

    fn update_stage(
        &self,
        lead_id: &str,
        stage: PipelineStage,
        note: Option<&str>,
        value: Option<f64>,
    ) -> Result<Lead, PipelineError> {
        let update = StageUpdate {
            stage,
            note: note.map(String::from),
            value,
        };
        self.db
            .with_conn(|conn| leads::update_stage(conn, lead_id, &update, Utc::now()))?
            .ok_or_else(|| PipelineError::NotFound(lead_id.to_string()))
    }

    fn delete_lead(&self, lead_id: &str) -> Result<(), PipelineError> {
        if self.db.with_conn(|conn| leads::delete_lead(conn, lead_id))? {
            Ok(())
        } else {
            Err(PipelineError::NotFound(lead_id.to_string()))
        }
    }

    fn archive_lead(&self, lead_id: &str) -> Result<(), PipelineError> {
        if self
            .db
            .with_conn(|conn| leads::set_archived(conn, lead_id, true, Utc::now()))?
        {
            Ok(())
        } else {
            Err(PipelineError::NotFound(lead_id.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP

const CRM_PATH: &str = "/api/crm";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStagePayload<'a> {
    lead_id: &'a str,
    nueva_etapa: PipelineStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    notas: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    valor: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeletePayload<'a> {
    lead_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ArchivePayload<'a> {
    lead_id: &'a str,
    archivado: bool,
}

#[derive(Deserialize)]
struct UpdateStageReply {
    lead: Lead,
}

#[derive(Deserialize)]
struct ErrorReply {
    error: String,
}

pub struct HttpLeadService {
    base_url: String,
    client: Client,
}

impl HttpLeadService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }


    fn url(&self) -> String {
        format!("{}{CRM_PATH}", self.base_url)
    }

    /// Turn a non-2xx reply into the matching error. A 404 only means
    /// "no such lead" for calls that name one.
    fn rejection(lead_id: Option<&str>, resp: reqwest::blocking::Response) -> PipelineError {
        let status = resp.status();
        let message = resp
            .json::<ErrorReply>()
            .map(|r| r.error)
            .unwrap_or_else(|_| "(no body)".to_string());

        match lead_id {
            Some(id) if status == StatusCode::NOT_FOUND => PipelineError::NotFound(id.to_string()),
            _ => PipelineError::Rejected {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl LeadService for HttpLeadService {
    fn list_leads(&self) -> Result<Vec<Lead>, PipelineError> {
        let resp = self
            .client
            .get(self.url())
            .send()
            .map_err(|e| PipelineError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::rejection(None, resp));
        }
        resp.json::<Vec<Lead>>()
            .map_err(|e| PipelineError::Network(format!("invalid lead list: {e}")))
    }

    fn update_stage(
        &self,
        lead_id: &str,
        stage: PipelineStage,
        note: Option<&str>,
        value: Option<f64>,
    ) -> Result<Lead, PipelineError> {
        let payload = UpdateStagePayload {
            lead_id,
            nueva_etapa: stage,
            notas: note,
            valor: value,
        };

        let resp = self
            .client
            .put(self.url())
            .json(&payload)
            .send()
            .map_err(|e| PipelineError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::rejection(Some(lead_id), resp));
        }
        resp.json::<UpdateStageReply>()
            .map(|r| r.lead)
            .map_err(|e| PipelineError::Network(format!("invalid update reply: {e}")))
    }

    fn delete_lead(&self, lead_id: &str) -> Result<(), PipelineError> {
        let resp = self
            .client
            .delete(self.url())
            .json(&DeletePayload { lead_id })
            .send()
            .map_err(|e| PipelineError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::rejection(Some(lead_id), resp));
        }
        Ok(())
    }

    fn archive_lead(&self, lead_id: &str) -> Result<(), PipelineError> {
        let resp = self
            .client
            .patch(self.url())
            .json(&ArchivePayload {
                lead_id,
                archivado: true,
            })
            .send()
            .map_err(|e| PipelineError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::rejection(Some(lead_id), resp));
        }
        Ok(())
    }
}
