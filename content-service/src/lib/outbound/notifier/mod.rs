pub mod http;

pub use http::MailApiNotifier;
