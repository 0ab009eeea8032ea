// templates/pages/home.rs

use crate::templates::{components::intake_form, desktop_layout};
use maud::{html, Markup};

pub fn home_page() -> Markup {
    desktop_layout(
        "Distribuidores",
        html! {
            main class="container" {
                section class="hero" {
                    h1 { "Sumate como distribuidor de MIMI Alfajores" }
                    p class="lead" {
                        "Dejanos tus datos y un asesor te contacta por WhatsApp."
                    }
                }

                section id="contacto" class="card" {
                    h2 { "Quiero más información" }
                    (intake_form())
                }
            }
        },
    )
}
