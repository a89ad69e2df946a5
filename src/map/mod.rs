//! The mind-map core: topic paths, branch colors, layout, and the editing
//! session that ties them together. Nothing here touches the terminal or
//! the filesystem.

pub mod color;
pub mod layout;
pub mod model;
pub mod path;
pub mod session;
