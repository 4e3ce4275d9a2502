pub mod csv_codec;
pub mod file_task;
