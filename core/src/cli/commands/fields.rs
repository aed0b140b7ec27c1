use super::print_json;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::AppError;

pub fn run(config: &Config, format: OutputFormat) -> Result<(), AppError> {
    if format == OutputFormat::Json {
        return print_json(&config.fields);
    }
    for (i, field) in config.fields.iter().enumerate() {
        println!("{:>3}. {field}", i + 1);
    }
    Ok(())
}
