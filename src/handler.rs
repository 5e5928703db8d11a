pub mod discovery;
pub mod messages;
pub mod profiles;
pub mod reviews;
pub mod users;
