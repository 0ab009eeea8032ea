// src/pipeline/kanban.rs

use crate::domain::PipelineStage;
use crate::errors::PipelineError;
use crate::pipeline::board::PipelineBoard;
use crate::pipeline::drag::{DragController, DragOutcome, TransitionRequest};
use crate::pipeline::engine::{transition, TransitionOutcome};
use crate::pipeline::service::LeadService;

/// The board as the page shell sees it: one snapshot, one drag
/// controller, one lead service. Gestures are handled one at a time.
pub struct Kanban<S> {
    board: PipelineBoard,
    drag: DragController,
    service: S,
}

impl<S: LeadService> Kanban<S> {
    pub fn new(service: S) -> Self {
        Self {
            board: PipelineBoard::new(),
            drag: DragController::new(),
            service,
        }
    }

    pub fn board(&self) -> &PipelineBoard {
        &self.board
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    #[cfg(test)]
    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn load(&mut self) -> Result<(), PipelineError> {
        self.board.load(&self.service)
    }

    pub fn drag_start(&mut self, lead_id: &str) {
        self.drag.drag_start(&self.board, lead_id);
    }

    /// Resolve the drop and, for a real move, run it through the
    /// optimistic update engine.
    pub fn drag_end(&mut self, drop_target: Option<&str>) -> TransitionOutcome {
        match self.drag.drag_end(&self.board, drop_target) {
            DragOutcome::Move(request) => transition(&mut self.board, &self.service, &request),
            DragOutcome::SameStage(_) | DragOutcome::Abandoned => TransitionOutcome::Unchanged,
        }
    }

    /// Move from a stage picker instead of a drag: the source is wherever
    /// the lead currently sits on the board.
    pub fn move_to(&mut self, lead_id: &str, to: PipelineStage) -> TransitionOutcome {
        let Some(from) = self.board.locate(lead_id) else {
            return TransitionOutcome::Unchanged;
        };
        let request = TransitionRequest {
            lead_id: lead_id.to_string(),
            from,
            to,
        };
        transition(&mut self.board, &self.service, &request)
    }

    /// Delete on the service, then drop the card locally.
    /// Not-found is reported to the caller; nothing is retried.
    pub fn delete(&mut self, lead_id: &str) -> Result<(), PipelineError> {
        self.service.delete_lead(lead_id)?;
        self.board.remove(lead_id);
        log::info!("Lead {lead_id} deleted");
        Ok(())
    }

    /// Archive on the service; the card leaves the board like a delete.
    pub fn archive(&mut self, lead_id: &str) -> Result<(), PipelineError> {
        self.service.archive_lead(lead_id)?;
        self.board.remove(lead_id);
        log::info!("Lead {lead_id} archived");
        Ok(())
    }
}
