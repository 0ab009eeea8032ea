use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn thanks_page() -> Markup {
    desktop_layout(
        "Gracias",
        html! {
            main class="container narrow" {
                h1 { "¡Gracias por tu consulta!" }
                p { "Recibimos tus datos. Te vamos a contactar a la brevedad." }
                a href="/" { "Volver al inicio" }
            }
        },
    )
}
