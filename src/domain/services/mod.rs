mod cache;
mod history;
mod timeline;

pub use cache::*;
pub use history::*;
pub use timeline::*;
