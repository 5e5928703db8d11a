pub mod avatar;
pub mod id_generator;
