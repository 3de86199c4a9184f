pub mod pdf;
pub mod wrap;

pub use pdf::{layout_lines, paginate, render_pdf, ResultExporter, EXPORT_FILENAME};
pub use wrap::{estimate_width_pt, wrap_text};
