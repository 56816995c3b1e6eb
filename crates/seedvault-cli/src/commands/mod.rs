pub mod decrypt;
pub mod encrypt;
pub mod init;
pub mod log;
pub mod misc;
pub mod status;
pub mod words;
