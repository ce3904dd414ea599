pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Read a command's input from `--input`, falling back to piped stdin.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
    command: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_json(path)
    } else if let Some(data) = stdin::read_stdin()? {
        serde_json::from_value(data).map_err(|e| format!("Invalid {command} input: {e}").into())
    } else {
        Err(format!("--input file is required for {command} (or pipe JSON on stdin)").into())
    }
}
