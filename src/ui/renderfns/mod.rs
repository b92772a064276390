pub mod footer;
pub mod header;
pub mod utils;

pub use footer::{draw_filter_bar, draw_footer, picker_field};
pub use header::draw_header;
pub use utils::{status_color, truncate, type_highlight};
