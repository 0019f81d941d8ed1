use rapid_tree::{parse_document, TreeError};
use std::env;
use std::fs;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: rapid-validate <file.yaml> [more files...]");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  rapid-validate page.yaml");
        eprintln!("  rapid-validate demos/*.yaml");
        process::exit(1);
    }

    let mut exit_code = 0;

    for file_path in &args[1..] {
        match validate_file(file_path) {
            Ok(()) => {
                println!("✓ {} is valid", file_path);
            }
            Err(e) => {
                eprintln!("✗ {} has errors:", file_path);
                print_error(&e);
                exit_code = 1;
            }
        }
    }

    process::exit(exit_code);
}

fn validate_file(path: &str) -> Result<(), TreeError> {
    let content = fs::read_to_string(path)
        .map_err(|e| TreeError::ValidationError(format!("Failed to read file: {}", e)))?;
    parse_document(&content)?;
    Ok(())
}

fn print_error(error: &TreeError) {
    match error {
        TreeError::InvalidChildTag { parent, child } => {
            eprintln!("  Invalid nesting:");
            eprintln!("    '{}' may not contain '{}'", parent, child);
        }
        TreeError::TextNotPermitted { parent } => {
            eprintln!("  Invalid nesting:");
            eprintln!("    '{}' may not contain text", parent);
        }
        TreeError::DuplicateId { id } => {
            eprintln!("  Duplicate id '{}'", id);
            eprintln!("    Node ids must be unique within the document");
        }
        TreeError::TextRoot => {
            eprintln!("  Document root must be an element node");
        }
        TreeError::ValidationError(msg) => {
            eprintln!("  Validation error:");
            eprintln!("    {}", msg);
        }
        TreeError::YamlError(msg) => {
            eprintln!("  YAML error:");
            eprintln!("    {}", msg);
        }
        e => {
            eprintln!("  {}", e);
        }
    }
}
