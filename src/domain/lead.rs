// src/domain/lead.rs

use crate::domain::stage::{IntakeStage, MonthlyVolume, PipelineStage};
use crate::errors::ServerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A prospective distributor captured by the intake form.
///
/// This is the one canonical shape shared by the store, the JSON API and
/// every view; views read only the fields they need.
/// Wire names follow the public API (`nombre`, `etapaCrm`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,

    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "negocio")]
    pub business: String,
    #[serde(rename = "ubicacion")]
    pub location: String,
    #[serde(rename = "cantidad", default, skip_serializing_if = "Option::is_none")]
    pub monthly_volume: Option<MonthlyVolume>,

    /// Buying readiness at submission time. Never changes.
    #[serde(rename = "etapa")]
    pub intake_stage: IntakeStage,
    /// Current pipeline position. Only changed by a stage transition.
    #[serde(rename = "etapaCrm")]
    pub stage: PipelineStage,

    pub whatsapp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "comentarios", default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    // Operator-editable
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "valor", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    /// Out-of-pipeline leads are kept in the store but never listed on the board.
    #[serde(rename = "archivado", default)]
    pub archived: bool,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Copy of this lead placed in another stage.
    pub fn with_stage(&self, stage: PipelineStage) -> Lead {
        Lead {
            stage,
            ..self.clone()
        }
    }
}

/// Validated intake data, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLead {
    pub name: String,
    pub business: String,
    pub location: String,
    pub monthly_volume: Option<MonthlyVolume>,
    pub intake_stage: IntakeStage,
    pub whatsapp: String,
    pub email: Option<String>,
    pub comments: Option<String>,
}

/// Raw intake payload as posted by the landing page (JSON or form).
#[derive(Debug, Default, Deserialize)]
pub struct ContactSubmission {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "negocio")]
    pub business: Option<String>,
    #[serde(rename = "ubicacion")]
    pub location: Option<String>,
    #[serde(rename = "cantidad")]
    pub monthly_volume: Option<String>,
    #[serde(rename = "etapa")]
    pub intake_stage: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "comentarios")]
    pub comments: Option<String>,
}

fn required(field: Option<String>) -> Option<String> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ContactSubmission {
    pub fn validate(self) -> Result<NewLead, ServerError> {
        let missing = || ServerError::BadRequest("Faltan campos obligatorios".into());

        Ok(NewLead {
            name: required(self.name).ok_or_else(missing)?,
            business: required(self.business).ok_or_else(missing)?,
            location: required(self.location).ok_or_else(missing)?,
            intake_stage: required(self.intake_stage)
                .map(|raw| IntakeStage::parse(&raw))
                .ok_or_else(missing)?,
            whatsapp: required(self.whatsapp).ok_or_else(missing)?,
            monthly_volume: self.monthly_volume.as_deref().and_then(MonthlyVolume::parse),
            email: required(self.email),
            comments: required(self.comments),
        })
    }
}
