use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | MIMI Alfajores" }
                link rel="icon" href="/static/favicon.ico";
                link rel="stylesheet" href="/static/main.css";
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    a href="/" { strong { "MIMI Alfajores" } }
                    nav {
                        ul {
                            li { a href="/" { "Inicio" } }
                            li { a href="/crm" { "CRM" } }
                            li { a href="/admin" { "Formularios" } }
                        }
                    }
                }
                (content)
            }
        }
    }
}
