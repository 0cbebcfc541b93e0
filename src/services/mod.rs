pub mod page_renderer;
pub mod page_writer;
pub mod shuffler;

pub use page_renderer::{PagePair, PageRenderer, RenderOptions, RenderedPage, MATHJAX_SCRIPT};
pub use page_writer::{PageWriter, WriteReport};
pub use shuffler::Shuffler;
