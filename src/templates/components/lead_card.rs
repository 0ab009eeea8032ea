use crate::domain::{Lead, PipelineStage};
use crate::templates::components::contact_links;
use maud::{html, Markup};

/// Card for one lead: what the operator needs at a glance, contact links
/// and a stage picker. The name opens the detail page.
pub fn lead_card(lead: &Lead) -> Markup {
    html! {
        article class="lead-card" id=(lead.id) draggable="true" data-lead-id=(lead.id) {
            h4 { a href=(format!("/crm/leads/{}", lead.id)) { (lead.name) } }
            p class="business" { (lead.business) }
            p class="location" { "📍 " (lead.location) }

            div class="badges" {
                span class="badge intake" { (lead.intake_stage.badge()) }
                @if let Some(volume) = lead.monthly_volume {
                    span class="badge volume" { (volume.label()) }
                }
                @if let Some(value) = lead.value {
                    span class="badge value" { "$" (format!("{value:.0}")) }
                }
            }

            @if let Some(note) = &lead.note {
                p class="note" { (note) }
            }

            (contact_links(lead))

            form method="post" action=(format!("/crm/leads/{}/stage", lead.id)) class="stage-picker" {
                select name="stage" {
                    @for stage in PipelineStage::ALL {
                        option value=(stage.id()) selected[stage == lead.stage] { (stage.title()) }
                    }
                }
                button type="submit" { "Mover" }
            }
        }
    }
}
