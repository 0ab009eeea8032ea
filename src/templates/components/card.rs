use maud::{html, Markup};

/// Small figure card used in the CRM header.
pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 class="text-sm font-medium" { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}
