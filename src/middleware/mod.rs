pub mod error_path;
