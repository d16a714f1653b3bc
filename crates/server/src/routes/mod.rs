pub mod comments;
pub mod explore;
pub mod files;
pub mod projects;
pub mod users;
