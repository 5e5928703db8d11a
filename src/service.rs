pub mod contact;
pub mod conversation;
pub mod discovery;
pub mod error;
pub mod toggles;
pub mod verification;
