pub mod bookmark;
pub mod experience;
pub mod notification;
pub mod project;
