pub mod commands;
pub mod config;
pub mod telemetry;
pub mod tensor_file;
