//! CLI library for testing purposes

pub mod commands;
pub mod logging;
pub mod validation;

pub use commands::{
    GenerateOptions, run_extract_command, run_generate_command, run_inspect_command,
};
pub use validation::{validate_file_path, validate_languages, validate_output_path};
