pub mod booking;
pub mod config;
pub mod delete;
pub mod init;
pub mod log;
pub mod login;
pub mod logout;
pub mod notes;
pub mod protocol;
pub mod signup;
pub mod status;
pub mod whoami;
