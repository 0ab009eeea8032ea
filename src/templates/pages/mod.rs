pub mod admin;
pub mod crm;
pub mod home;
pub mod lead_detail;
pub mod thanks;

pub use admin::admin_page;
pub use crm::crm_page;
pub use home::home_page;
pub use lead_detail::lead_detail_page;
pub use thanks::thanks_page;
