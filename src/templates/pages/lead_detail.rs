use crate::domain::Lead;
use crate::templates::{components::contact_links, desktop_layout};
use maud::{html, Markup};

/// Everything known about one lead, with the actions that take it off the
/// board.
pub fn lead_detail_page(lead: &Lead) -> Markup {
    desktop_layout(
        &lead.name,
        html! {
            main class="container narrow" {
                p { a href="/crm" { "← Volver al CRM" } }
                h1 { (lead.name) }
                p class="business" { (lead.business) " · " (lead.location) }

                dl class="lead-detail" {
                    dt { "Etapa" }
                    dd { (lead.stage.icon()) " " (lead.stage.title()) }
                    dt { "Situación" }
                    dd { (lead.intake_stage.badge()) }
                    dt { "Cantidad estimada" }
                    dd { (lead.monthly_volume.map_or("No especificado", |v| v.label())) }
                    dt { "WhatsApp" }
                    dd { (lead.whatsapp) }
                    dt { "Email" }
                    dd { (lead.email.as_deref().unwrap_or("-")) }
                    @if let Some(value) = lead.value {
                        dt { "Valor" }
                        dd { "$" (format!("{value:.0}")) }
                    }
                    dt { "Creado" }
                    dd { (lead.created_at.format("%d/%m/%Y %H:%M")) }
                }

                @if let Some(comments) = &lead.comments {
                    h2 { "Comentarios" }
                    p class="comments" { (comments) }
                }
                @if let Some(note) = &lead.note {
                    h2 { "Notas" }
                    p class="note" { (note) }
                }

                (contact_links(lead))

                div class="card-actions" {
                    form method="post" action=(format!("/crm/leads/{}/archive", lead.id)) {
                        button type="submit" { "Archivar" }
                    }
                    form method="post" action=(format!("/crm/leads/{}/delete", lead.id))
                        onsubmit="return confirm('¿Eliminar este lead?');" {
                        button type="submit" class="danger" { "Eliminar" }
                    }
                }
            }
        },
    )
}
