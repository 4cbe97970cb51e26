use log::{error, info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }
    pub fn load_atomic_masses(&self) -> Result<HashMap<String, f64>, String> {
        load_atomic_masses_from_file(&self.file_name)
    }
}

/// Reads a flat JSON object mapping element symbols to atomic masses, e.g. {"H": 1.008, "O": 15.999}.
/// Parsing errors are reported with the line and column and the problematic line is logged.
pub fn load_atomic_masses_from_file(file_name: &str) -> Result<HashMap<String, f64>, String> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(format!("File '{}' does not exist", file_name));
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => return Err(format!("Failed to open file '{}': {}", file_name, e)),
    };

    let masses = parse_atomic_masses(&content, file_name)?;
    if masses.is_empty() {
        warn!("Atomic masses file '{}' contains no elements", file_name);
    }
    info!(
        "Loaded atomic masses of {} elements from file '{}'",
        masses.len(),
        file_name
    );
    Ok(masses)
}

/// Parses the JSON text of an atomic masses resource. `source_name` only labels the messages.
pub fn parse_atomic_masses(content: &str, source_name: &str) -> Result<HashMap<String, f64>, String> {
    let result: Result<HashMap<String, f64>, serde_json::Error> = serde_json::from_str(content);
    match result {
        Ok(data) => Ok(data),
        Err(e) => {
            let error_line = e.line();
            let error_column = e.column();
            let error_msg = format!(
                "Error parsing atomic masses from '{}' at line {}, column {}: {}",
                source_name, error_line, error_column, e
            );
            error!("{}", error_msg);

            // serde_json counts lines from 1
            if error_line >= 1 {
                if let Some(problem_line) = content.lines().nth(error_line - 1) {
                    error!("Problematic line: {}", problem_line);
                    if error_column >= 1 && error_column <= problem_line.len() + 1 {
                        let pointer = " ".repeat(error_column - 1) + "^";
                        error!("{}", pointer);
                    }
                }
            }
            Err(error_msg)
        }
    }
}
