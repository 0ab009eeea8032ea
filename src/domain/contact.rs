// src/domain/contact.rs

use crate::domain::lead::Lead;
use url::form_urlencoded::byte_serialize;

const COUNTRY_CODE: &str = "54";
const BRAND: &str = "MIMI Alfajores";

/// Digits of the lead's WhatsApp number with the country code prefixed.
/// `None` when the number has no digits at all.
pub fn full_phone_number(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    if digits.starts_with(COUNTRY_CODE) {
        Some(digits)
    } else {
        Some(format!("{COUNTRY_CODE}{digits}"))
    }
}

fn encode(text: &str) -> String {
    // form encoding turns spaces into '+', which mail clients and wa.me
    // show literally
    byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

pub fn call_link(lead: &Lead) -> Option<String> {
    full_phone_number(&lead.whatsapp).map(|n| format!("tel:+{n}"))
}

pub fn whatsapp_link(lead: &Lead) -> Option<String> {
    let number = full_phone_number(&lead.whatsapp)?;
    let message = format!(
        "Hola {}! Te contacto desde {BRAND} respecto a tu consulta sobre distribución. ¿Cuándo podemos hablar?",
        lead.name
    );
    Some(format!("https://wa.me/{number}?text={}", encode(&message)))
}

pub fn email_link(lead: &Lead) -> Option<String> {
    let email = lead.email.as_deref()?;
    let subject = format!("{BRAND} - Consulta de {}", lead.name);
    let body = format!(
        "Hola {name},\n\n\
         Te contacto desde {BRAND} respecto a tu consulta sobre distribución.\n\n\
         Información de tu consulta:\n\
         - Negocio: {business}\n\
         - Ubicación: {location}\n\
         - Cantidad estimada: {volume}\n\
         - Etapa: {intake}\n\n\
         ¿Cuándo podemos coordinar una llamada para conversar sobre la oportunidad?\n\n\
         Saludos,\nEquipo MIMI",
        name = lead.name,
        business = lead.business,
        location = lead.location,
        volume = lead
            .monthly_volume
            .map(|v| v.label())
            .unwrap_or("No especificada"),
        intake = lead.intake_stage.as_str(),
    );
    Some(format!(
        "mailto:{email}?subject={}&body={}",
        encode(&subject),
        encode(&body)
    ))
}
