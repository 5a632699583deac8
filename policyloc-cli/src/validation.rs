use policyloc::LanguageList;
use std::path::Path;

/// Validate file path exists and is readable
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("File does not exist: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    Ok(())
}

/// Validate that the output path does not point at a directory
pub fn validate_output_path(path: &str) -> Result<(), String> {
    if path.trim().is_empty() {
        return Err("Output path cannot be empty".to_string());
    }

    if Path::new(path).is_dir() {
        return Err(format!("Output path is a directory: {}", path));
    }

    Ok(())
}

/// Validate the `--languages` list: BCP 47 codes, no duplicates, at least one.
pub fn validate_languages(languages: &[String]) -> Result<LanguageList, String> {
    LanguageList::new(languages.iter().cloned())
        .map_err(|e| format!("Language validation failed: {}", e))
}
