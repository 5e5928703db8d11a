// service/contact.rs
//! Who may start or continue a conversation with whom.

use crate::{
    models::{profilemodel::CaProfile, usermodel::UserRole},
    service::error::ServiceError,
};

/// Checks a new message against the receiver's verification state.
///
/// A professional (a CA or accountant account, or anyone owning a listing) can only be
/// messaged once one of their listings is verified. Writing to yourself and replies to
/// clients always go through. A listing named on the message must itself be verified
/// unless the sender owns it.
pub fn can_contact(
    sender_id: &str,
    receiver_id: &str,
    receiver_role: Option<UserRole>,
    receiver_profiles: &[CaProfile],
    listing: Option<&CaProfile>,
) -> Result<(), ServiceError> {
    if let Some(listing) = listing {
        if listing.user_id != sender_id && !listing.is_contactable() {
            return Err(ServiceError::ProfileNotContactable(listing.id.clone()));
        }
    }

    if sender_id == receiver_id {
        return Ok(());
    }

    let owned: Vec<&CaProfile> = receiver_profiles
        .iter()
        .filter(|profile| profile.user_id == receiver_id)
        .collect();
    let professional = receiver_role.is_some_and(|role| role.is_professional()) || !owned.is_empty();

    if professional && !owned.iter().any(|profile| profile.is_contactable()) {
        return Err(ServiceError::ProfileNotContactable(receiver_id.to_string()));
    }
    Ok(())
}
