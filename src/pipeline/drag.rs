// src/pipeline/drag.rs

use crate::domain::{Lead, PipelineStage};
use crate::pipeline::board::PipelineBoard;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// `source` is `None` when the card was no longer on the board at
    /// drag start.
    Dragging {
        lead_id: String,
        source: Option<PipelineStage>,
    },
}

/// A resolved move of one lead between two different stages.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRequest {
    pub lead_id: String,
    pub from: PipelineStage,
    pub to: PipelineStage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// No drag in progress, no drop target, an unknown target, or the
    /// dragged card is gone from the board.
    Abandoned,
    /// Dropped back on the column it came from.
    SameStage(PipelineStage),
    Move(TransitionRequest),
}

/// Turns drag-start / drag-end events into transition requests.
///
/// Drop targets are either a stage id (the column itself) or a lead id
/// (another card, meaning that card's column).
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn drag_start(&mut self, board: &PipelineBoard, lead_id: &str) {
        self.state = DragState::Dragging {
            lead_id: lead_id.to_string(),
            source: board.locate(lead_id),
        };
    }

    /// Card shown under the pointer while dragging.
    pub fn active_lead<'b>(&self, board: &'b PipelineBoard) -> Option<&'b Lead> {
        match &self.state {
            DragState::Dragging { lead_id, .. } => board.get(lead_id),
            DragState::Idle => None,
        }
    }

    /// Resolve the drop. Always leaves the controller idle.
    pub fn drag_end(&mut self, board: &PipelineBoard, drop_target: Option<&str>) -> DragOutcome {
        let DragState::Dragging { lead_id, source } = std::mem::take(&mut self.state) else {
            return DragOutcome::Abandoned;
        };

        // Where the card is now, not where it was picked up: a reload may
        // have landed in between.
        let Some(from) = board.locate(&lead_id) else {
            return DragOutcome::Abandoned;
        };
        if source != Some(from) {
            log::debug!("Lead {lead_id} changed column during the drag");
        }
        let Some(to) = drop_target.and_then(|target| resolve_target(board, target)) else {
            return DragOutcome::Abandoned;
        };

        if from == to {
            return DragOutcome::SameStage(from);
        }
        DragOutcome::Move(TransitionRequest { lead_id, from, to })
    }
}

fn resolve_target(board: &PipelineBoard, target: &str) -> Option<PipelineStage> {
    target
        .parse::<PipelineStage>()
        .ok()
        .or_else(|| board.locate(target))
}
