const DICEBEAR_BASE: &str = "https://api.dicebear.com/7.x";

/// Initials placeholder shown for contacts missing from the directory.
pub fn initials_avatar(seed: &str) -> String {
    format!("{}/initials/svg?seed={}", DICEBEAR_BASE, seed)
}

/// Default avatar assigned at signup.
pub fn signup_avatar(seed: &str) -> String {
    format!("{}/avataaars/svg?seed={}", DICEBEAR_BASE, seed)
}
