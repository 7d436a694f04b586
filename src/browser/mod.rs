pub mod lookup;
pub mod models;
pub mod projector;
pub mod scanner;
pub mod session;

pub use models::{BodyVariant, MessageDetail, MessageSummary};
pub use scanner::NamespaceScanner;
pub use session::BrowseSession;
