use crate::domain::IntakeStage;
use maud::{html, Markup};

/// Distributor intake form. Posts urlencoded to `/contact`.
pub fn intake_form() -> Markup {
    html! {
        form method="post" action="/contact" class="intake-form" {
            label for="nombre" { "Nombre y apellido *" }
            input type="text" id="nombre" name="nombre" autocomplete="name" required;

            label for="negocio" { "Nombre del negocio *" }
            input type="text" id="negocio" name="negocio" required;

            label for="ubicacion" { "Ciudad y provincia *" }
            input type="text" id="ubicacion" name="ubicacion" required;

            label for="cantidad" { "Cantidad estimada mensual" }
            select id="cantidad" name="cantidad" {
                option value="" selected { "Seleccionar..." }
                option value="menos-24" { "Menos de 24 docenas" }
                option value="24-100" { "Entre 24 docenas y 100 docenas" }
                option value="mas-100" { "Más de 100 docenas" }
            }

            label for="etapa" { "¿En qué etapa te encontrás respecto a la compra? *" }
            select id="etapa" name="etapa" required {
                option value="" disabled selected { "Seleccionar..." }
                @for (stage, label) in IntakeStage::form_options() {
                    option value=(stage.as_str()) { (label) }
                }
            }

            label for="whatsapp" { "WhatsApp *" }
            input type="tel" id="whatsapp" name="whatsapp" autocomplete="tel" required;

            label for="email" { "Email" }
            input type="email" id="email" name="email" autocomplete="email";

            label for="comentarios" { "Comentarios" }
            textarea id="comentarios" name="comentarios" rows="3" {}

            button type="submit" class="primary" { "Quiero ser distribuidor" }
        }
    }
}
