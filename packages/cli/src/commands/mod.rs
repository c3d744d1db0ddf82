pub mod init;
pub mod publish;
pub mod render;
pub mod slug;

pub use init::{init, InitArgs};
pub use publish::{publish, PublishArgs};
pub use render::{render, RenderArgs};
pub use slug::{slug, SlugArgs};
