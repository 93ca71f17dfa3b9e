pub mod admin;
pub mod init;
pub mod student;
