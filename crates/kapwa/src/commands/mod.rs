pub mod check;
pub mod entries;
pub mod generate;
pub mod init;
pub mod watch;
