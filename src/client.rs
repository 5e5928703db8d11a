//! Client side of the marketplace: the REST client, derived views computed
//! from its responses, and the signed-in session.

pub mod api;
pub mod session;
pub mod storage;

#[cfg(test)]
mod fake;
