// src/analytics.rs
//! Conversion reporting, handed to whoever triggers a conversion.

#[cfg(test)]
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionEvent {
    /// Intake form accepted.
    LeadSubmitted { lead_id: String },
    /// Lead moved into the won stage.
    LeadWon { lead_id: String },
}

impl ConversionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ConversionEvent::LeadSubmitted { .. } => "lead_submitted",
            ConversionEvent::LeadWon { .. } => "lead_won",
        }
    }
}

pub trait ConversionReporter: Send + Sync {
    fn report(&self, event: &ConversionEvent);
}

/// Writes conversions to the application log.
pub struct LogReporter;

impl ConversionReporter for LogReporter {
    fn report(&self, event: &ConversionEvent) {
        match event {
            ConversionEvent::LeadSubmitted { lead_id } | ConversionEvent::LeadWon { lead_id } => {
                log::info!(target: "conversion", "{} lead={lead_id}", event.name());
            }
        }
    }
}

/// Keeps every reported event in memory.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ConversionEvent>>,
}

#[cfg(test)]
impl RecordingReporter {
    pub fn events(&self) -> Vec<ConversionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl ConversionReporter for RecordingReporter {
    fn report(&self, event: &ConversionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
