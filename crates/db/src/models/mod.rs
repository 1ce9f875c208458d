pub mod attachment;
pub mod bucket;
pub mod chat_message;
pub mod client;
pub mod department;
pub mod line_contact;
pub mod manager;
pub mod project;
pub mod task;
