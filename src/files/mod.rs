pub mod output;
pub mod workbook;

pub use output::{latest_output, output_file_name, read_records, write_records};
pub use workbook::load_registry_rows;
