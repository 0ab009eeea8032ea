// src/pipeline/stats.rs

use crate::domain::PipelineStage;
use crate::pipeline::board::PipelineBoard;

/// Header figures of the CRM board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardStats {
    pub total_leads: usize,
    pub total_value: f64,
    pub won: usize,
}

impl BoardStats {
    pub fn from_board(board: &PipelineBoard) -> Self {
        Self {
            total_leads: board.len(),
            total_value: board.leads().filter_map(|l| l.value).sum(),
            won: board.bucket(PipelineStage::Won).len(),
        }
    }

    /// Won leads over all leads, as a percentage. Zero on an empty board.
    pub fn conversion_rate(&self) -> f64 {
        if self.total_leads == 0 {
            return 0.0;
        }
        self.won as f64 / self.total_leads as f64 * 100.0
    }

    /// "12.5", or "0" on an empty board.
    pub fn conversion_rate_label(&self) -> String {
        if self.total_leads == 0 {
            "0".to_string()
        } else {
            format!("{:.1}", self.conversion_rate())
        }
    }
}
