//! File system export adapter

mod file;

pub use file::FileExportAdapter;
