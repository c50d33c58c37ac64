pub mod init;
pub mod provider;
pub mod run;
pub mod test;
pub mod version;
