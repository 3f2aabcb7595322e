pub mod layout;
pub mod toasts;
pub mod widgets;

pub use layout::Shell;
pub use toasts::ToastStack;
pub use widgets::{Chip, ErrorBanner, Loading, Pager, SearchBox};
