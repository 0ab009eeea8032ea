pub mod contact;
pub mod ids;
pub mod lead;
pub mod stage;

pub use lead::{ContactSubmission, Lead, NewLead};
pub use stage::{IntakeStage, MonthlyVolume, PipelineStage};
