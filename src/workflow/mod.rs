pub mod page_ctx;

pub use page_ctx::{page_file_name, PageCtx, PageView};
