use crate::domain::{Lead, PipelineStage};
use crate::templates::components::lead_card;
use maud::{html, Markup};

pub fn kanban_column(stage: PipelineStage, leads: &[Lead]) -> Markup {
    html! {
        section class="kanban-column" id=(stage.id()) data-stage=(stage.id()) {
            header {
                span { (stage.icon()) }
                h3 { (stage.title()) }
                span class="count" { (leads.len()) }
            }
            @if leads.is_empty() {
                p class="empty" { "No hay leads en esta etapa" }
            }
            @for lead in leads {
                (lead_card(lead))
            }
        }
    }
}
