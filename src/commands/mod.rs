pub mod add;
pub mod connect;
pub mod delete;
pub mod editing;
pub mod init;
pub mod list;
pub mod maps;
pub mod new;
pub mod outline;
pub mod rename;
pub mod show;
pub mod style;
pub mod view;
