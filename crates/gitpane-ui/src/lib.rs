//! Toolkit-independent presentation layer for the changes panel: row models, context menus,
//! the resizable split and host event plumbing. A renderer reads `view::ChangesView` and feeds
//! pointer and keyboard input back into it.

pub mod context_menu;
pub mod layout;
pub mod settings;
pub mod subscriptions;
pub mod view;
