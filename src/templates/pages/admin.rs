use crate::domain::contact::whatsapp_link;
use crate::domain::Lead;
use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Every intake submission, newest first, archived ones included.
pub fn admin_page(submissions: &[Lead]) -> Markup {
    desktop_layout(
        "Formularios",
        html! {
            main class="container wide" {
                div class="flex items-center justify-between" {
                    h1 { "Panel de Administración - Formularios de Contacto" }
                    a href="/admin" class="button" { "Actualizar" }
                }
                p { "Total de formularios: " strong { (submissions.len()) } }

                @if submissions.is_empty() {
                    p class="empty" { "No hay formularios enviados aún." }
                }
                @for lead in submissions {
                    article class="card submission" {
                        header {
                            h2 { (lead.name) " - " (lead.business) }
                            span class="badge intake" { (lead.intake_stage.badge()) }
                            p class="date" { "Enviado el " (lead.created_at.format("%d/%m/%Y %H:%M")) }
                        }
                        dl {
                            dt { "Ubicación" }
                            dd { (lead.location) }
                            dt { "Cantidad estimada" }
                            dd { (lead.monthly_volume.map_or("No especificado", |v| v.label())) }
                            dt { "WhatsApp" }
                            dd {
                                @if let Some(link) = whatsapp_link(lead) {
                                    a href=(link) target="_blank" rel="noopener" { (lead.whatsapp) }
                                } @else {
                                    (lead.whatsapp)
                                }
                            }
                            @if let Some(email) = &lead.email {
                                dt { "Email" }
                                dd { a href=(format!("mailto:{email}")) { (email) } }
                            }
                        }
                        @if let Some(comments) = &lead.comments {
                            p class="comments" { (comments) }
                        }
                    }
                }
            }
        },
    )
}
