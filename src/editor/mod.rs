pub mod autosave;
pub mod builder;
pub mod clipboard;
pub mod history;
pub mod notice;
pub mod sections;
pub mod session;

pub use autosave::{Autosaver, SaveStatus};
pub use builder::{BuilderAction, StoreBuilder};
pub use clipboard::Clipboard;
pub use history::{HistoryStack, HistoryState, MAX_HISTORY};
pub use notice::{Notice, NoticeLevel};
pub use sections::Direction;
pub use session::EditorSession;
