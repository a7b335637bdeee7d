mod npy;
mod table;

pub use npy::write_numpy;

pub use table::read_class_table;
pub use table::read_class_table_json;
pub use table::write_table;
