pub mod card;
pub mod contact_links;
pub mod error;
pub mod intake_form;
pub mod kanban_column;
pub mod lead_card;

pub use card::card;
pub use contact_links::contact_links;
pub use error::html_error_response;
pub use intake_form::intake_form;
pub use kanban_column::kanban_column;
pub use lead_card::lead_card;
