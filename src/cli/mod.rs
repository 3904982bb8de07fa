pub mod commands;
pub mod render;
pub mod ui;
pub mod util;

pub use util::CommandContext;
