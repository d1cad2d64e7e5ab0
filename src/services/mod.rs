pub mod accounts;
pub mod interactions;
pub mod mailer;
pub mod rankings;

pub use mailer::Mailer;
