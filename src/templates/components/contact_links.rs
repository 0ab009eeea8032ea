use crate::domain::contact::{call_link, email_link, whatsapp_link};
use crate::domain::Lead;
use maud::{html, Markup};

pub fn contact_links(lead: &Lead) -> Markup {
    html! {
        div class="contact" {
            @if let Some(link) = call_link(lead) {
                a href=(link) { "📞 Llamar" }
            }
            @if let Some(link) = whatsapp_link(lead) {
                a href=(link) target="_blank" rel="noopener" { "💬 WhatsApp" }
            }
            @if let Some(link) = email_link(lead) {
                a href=(link) { "📧 Email" }
            }
        }
    }
}
