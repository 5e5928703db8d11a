// utils/id_generator.rs
use rand::distr::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

const SUFFIX_LEN: usize = 9;

/// Short prefixed id such as `u-k3j9x0a1b`, lowercase alphanumeric suffix.
pub fn generate_prefixed_id(prefix: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| (rng.sample(Alphanumeric) as char).to_ascii_lowercase())
        .collect();
    format!("{}-{}", prefix, suffix)
}

pub fn generate_user_id() -> String {
    generate_prefixed_id("u")
}

pub fn generate_profile_id() -> String {
    generate_prefixed_id("ca")
}

pub fn generate_message_id() -> String {
    format!("m-{}", Uuid::new_v4().simple())
}
