/// reading of data resources (atomic masses) from JSON files
pub mod load_from_file;
