// src/pipeline/engine.rs

use crate::domain::Lead;
use crate::errors::PipelineError;
use crate::pipeline::board::PipelineBoard;
use crate::pipeline::drag::TransitionRequest;
use crate::pipeline::service::LeadService;

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// Same source and target, or the lead is not in the source bucket.
    /// No local change, no service call.
    Unchanged,
    /// The service accepted the move; the board already shows it.
    Committed(Lead),
    /// The service refused; the board was reloaded from the store.
    RolledBack(PipelineError),
    /// The service refused and the reload failed too; the local move was
    /// undone so the board is back to the last loaded snapshot.
    Reverted {
        error: PipelineError,
        reload_error: PipelineError,
    },
}

impl TransitionOutcome {
    #[cfg(test)]
    pub fn is_committed(&self) -> bool {
        matches!(self, TransitionOutcome::Committed(_))
    }
}

/// Move a lead optimistically.
///
/// The board changes before the service is called. On any service error
/// the board is reloaded; there is no retry.
pub fn transition<S: LeadService + ?Sized>(
    board: &mut PipelineBoard,
    service: &S,
    request: &TransitionRequest,
) -> TransitionOutcome {
    let TransitionRequest { lead_id, from, to } = request;

    if from == to {
        return TransitionOutcome::Unchanged;
    }
    let snapshot = board.clone();
    if !board.move_lead(lead_id, *from, *to) {
        log::warn!("Lead {lead_id} is not in {from}, skipping move to {to}");
        return TransitionOutcome::Unchanged;
    }

    match service.update_stage(lead_id, *to, None, None) {
        Ok(lead) => {
            log::info!("Lead {lead_id} moved {from} -> {to}");
            TransitionOutcome::Committed(lead)
        }
        Err(error) => {
            log::warn!("Moving lead {lead_id} to {to} failed: {error}; reloading board");
            match board.load(service) {
                Ok(()) => TransitionOutcome::RolledBack(error),
                Err(reload_error) => {
                    log::error!("Board reload after failed move also failed: {reload_error}");
                    *board = snapshot;
                    TransitionOutcome::Reverted {
                        error,
                        reload_error,
                    }
                }
            }
        }
    }
}
