mod backend;
mod message;
mod role;
mod session_id;
mod slash_commands;
mod timeline;

pub use backend::*;
pub use message::*;
pub use role::*;
pub use session_id::*;
pub use slash_commands::*;
pub use timeline::*;
