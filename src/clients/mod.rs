pub mod appwrite;
pub mod mailer;
pub mod store;
