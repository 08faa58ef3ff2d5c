pub mod record_bar;
pub mod sidebar;
pub mod transcript;

pub use record_bar::RecordBar;
pub use sidebar::Sidebar;
pub use transcript::Transcript;
