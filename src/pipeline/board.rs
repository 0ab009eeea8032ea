// src/pipeline/board.rs

use crate::domain::{Lead, PipelineStage};
use crate::errors::PipelineError;
use crate::pipeline::service::LeadService;
use std::collections::HashMap;

/// Last fetched snapshot of the pipeline, grouped by stage.
///
/// Every lead on the board sits in exactly one bucket, and `index` always
/// names that bucket. Both are rebuilt wholesale by [`PipelineBoard::load`]
/// and kept in step by the local move/remove operations.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PipelineBoard {
    buckets: [Vec<Lead>; 5],
    index: HashMap<String, PipelineStage>,
}

impl PipelineBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition a flat listing by stage, keeping the listing order inside
    /// each bucket. A repeated id keeps its first occurrence.
    pub fn from_leads(leads: Vec<Lead>) -> Self {
        let mut board = Self::default();
        for lead in leads {
            if board.index.contains_key(&lead.id) {
                log::warn!("Duplicate lead {} in listing, keeping first", lead.id);
                continue;
            }
            board.index.insert(lead.id.clone(), lead.stage);
            board.buckets[lead.stage.index()].push(lead);
        }
        board
    }

    /// Replace the snapshot with a fresh listing from `service`.
    /// On failure the current snapshot is left untouched.
    pub fn load<S: LeadService + ?Sized>(&mut self, service: &S) -> Result<(), PipelineError> {
        let leads = service.list_leads()?;
        *self = Self::from_leads(leads);
        Ok(())
    }

    pub fn bucket(&self, stage: PipelineStage) -> &[Lead] {
        &self.buckets[stage.index()]
    }

    /// Stage of the bucket holding `lead_id`, if it is on the board.
    pub fn locate(&self, lead_id: &str) -> Option<PipelineStage> {
        self.index.get(lead_id).copied()
    }

    pub fn get(&self, lead_id: &str) -> Option<&Lead> {
        let stage = self.locate(lead_id)?;
        self.bucket(stage).iter().find(|l| l.id == lead_id)
    }

    /// All leads, column by column.
    pub fn leads(&self) -> impl Iterator<Item = &Lead> {
        self.buckets.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Take `lead_id` out of `from` and append a copy with `stage = to` to
    /// `to`. Returns false (and changes nothing) if the lead is not in `from`.
    pub fn move_lead(&mut self, lead_id: &str, from: PipelineStage, to: PipelineStage) -> bool {
        let source = &mut self.buckets[from.index()];
        let Some(pos) = source.iter().position(|l| l.id == lead_id) else {
            return false;
        };

        let lead = source.remove(pos);
        self.buckets[to.index()].push(lead.with_stage(to));
        self.index.insert(lead.id, to);
        true
    }

    /// Drop a lead from the board. Returns the removed lead.
    pub fn remove(&mut self, lead_id: &str) -> Option<Lead> {
        let stage = self.index.remove(lead_id)?;
        let bucket = &mut self.buckets[stage.index()];
        let pos = bucket.iter().position(|l| l.id == lead_id)?;
        Some(bucket.remove(pos))
    }
}
