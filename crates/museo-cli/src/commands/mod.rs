pub mod completion;
pub mod data;
pub mod report;
pub mod serve;
pub mod stats;

/// Quote a CSV field when it contains a separator, quote or newline
pub(crate) fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
