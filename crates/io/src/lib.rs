// File I/O: place tables in, merged registry out

pub mod csv;
pub mod error;
pub mod json;
pub mod load;
pub mod registry;
pub mod table;
pub mod xlsx;

pub use error::IoError;
pub use load::{load_new, load_old};
pub use registry::write_registry;
pub use table::{read_table, write_table, Table, TableFormat};
