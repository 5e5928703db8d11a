// service/verification.rs
//! Profile verification lifecycle:
//! `unverified -> email_verified -> pending_admin_approval -> verified | rejected`.
//!
//! There is no way back out of `verified` or `rejected`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    profilemodel::{CaProfile, VerificationStatus},
    usermodel::UserRole,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VerificationError {
    #[error("Please provide feedback for rejection.")]
    MissingFeedback,

    #[error("Only CA and accountant accounts go through profile verification (role {0:?})")]
    NotProfessional(UserRole),

    #[error("Profile is not awaiting admin review (status {})", .0.to_str())]
    NotAwaitingReview(VerificationStatus),

    #[error("Profile is already {}; cannot mark it {}", .current.to_str(), .requested.to_str())]
    ConflictingDecision {
        current: VerificationStatus,
        requested: VerificationStatus,
    },
}

/// Outcome of an administrator review.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Verified,
    Rejected,
}

impl ReviewDecision {
    pub fn target(&self) -> VerificationStatus {
        match self {
            ReviewDecision::Verified => VerificationStatus::Verified,
            ReviewDecision::Rejected => VerificationStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Advanced {
        from: VerificationStatus,
        to: VerificationStatus,
    },
    Unchanged(VerificationStatus),
}

impl Transition {
    pub fn status(&self) -> VerificationStatus {
        match self {
            Transition::Advanced { to, .. } => *to,
            Transition::Unchanged(status) => *status,
        }
    }
}

/// Fields written back to the profile after a review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub status: VerificationStatus,
    pub is_verified: bool,
    pub admin_feedback: Option<String>,
    pub changed: bool,
}

/// Email confirmation by the profile owner queues the profile for admin review.
/// Confirming again, or after a decision, leaves the status as it is.
pub fn confirm_email(
    role: UserRole,
    current: VerificationStatus,
) -> Result<Transition, VerificationError> {
    if !role.is_professional() {
        return Err(VerificationError::NotProfessional(role));
    }

    match current {
        VerificationStatus::Unverified | VerificationStatus::EmailVerified => {
            Ok(Transition::Advanced {
                from: current,
                to: VerificationStatus::PendingAdminApproval,
            })
        }
        VerificationStatus::PendingAdminApproval
        | VerificationStatus::Verified
        | VerificationStatus::Rejected => Ok(Transition::Unchanged(current)),
    }
}

/// Trims feedback; rejection needs some.
pub fn require_feedback(
    decision: ReviewDecision,
    feedback: Option<&str>,
) -> Result<Option<String>, VerificationError> {
    let feedback = feedback
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    if decision == ReviewDecision::Rejected && feedback.is_none() {
        return Err(VerificationError::MissingFeedback);
    }
    Ok(feedback)
}

pub fn review(
    current: VerificationStatus,
    decision: ReviewDecision,
    feedback: Option<&str>,
) -> Result<ReviewOutcome, VerificationError> {
    let admin_feedback = require_feedback(decision, feedback)?;
    let target = decision.target();

    let changed = match current {
        VerificationStatus::PendingAdminApproval => true,
        status if status == target => false,
        status if status.is_terminal() => {
            return Err(VerificationError::ConflictingDecision {
                current: status,
                requested: target,
            })
        }
        status => return Err(VerificationError::NotAwaitingReview(status)),
    };

    Ok(ReviewOutcome {
        status: target,
        is_verified: target == VerificationStatus::Verified,
        admin_feedback,
        changed,
    })
}

/// An entry of the admin queue. Only `pending_admin_approval` profiles can be decided;
/// the others still wait for the owner's email confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueuedProfile {
    #[serde(flatten)]
    pub profile: CaProfile,
    pub awaiting_decision: bool,
}

/// Profiles shown in the admin queue, oldest registrations first.
pub fn review_queue(mut profiles: Vec<CaProfile>) -> Vec<QueuedProfile> {
    profiles.retain(|profile| profile.verification_status.is_queued());
    profiles.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    profiles
        .into_iter()
        .map(|profile| QueuedProfile {
            awaiting_decision: profile.verification_status == VerificationStatus::PendingAdminApproval,
            profile,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{epoch, profile};
    use crate::models::profilemodel::VerificationStatus::*;

    #[test]
    fn email_confirmation_queues_professional_profiles() {
        for role in [UserRole::Ca, UserRole::Accountant] {
            for start in [Unverified, EmailVerified] {
                let transition = confirm_email(role, start).unwrap();
                assert_eq!(
                    transition,
                    Transition::Advanced {
                        from: start,
                        to: PendingAdminApproval
                    }
                );
            }
        }
    }

    #[test]
    fn email_confirmation_is_idempotent_and_never_regresses() {
        for status in [PendingAdminApproval, Verified, Rejected] {
            let transition = confirm_email(UserRole::Ca, status).unwrap();
            assert_eq!(transition, Transition::Unchanged(status));
            assert_eq!(transition.status(), status);
        }
    }

    #[test]
    fn email_confirmation_requires_professional_role() {
        assert_eq!(
            confirm_email(UserRole::Client, Unverified),
            Err(VerificationError::NotProfessional(UserRole::Client))
        );
        assert!(confirm_email(UserRole::Admin, Unverified).is_err());
    }

    #[test]
    fn approving_pending_profile_verifies_it() {
        let outcome = review(PendingAdminApproval, ReviewDecision::Verified, None).unwrap();
        assert_eq!(outcome.status, Verified);
        assert!(outcome.is_verified);
        assert!(outcome.changed);
        assert_eq!(outcome.admin_feedback, None);
    }

    #[test]
    fn rejecting_without_feedback_is_refused() {
        for feedback in [None, Some(""), Some("   ")] {
            assert_eq!(
                review(PendingAdminApproval, ReviewDecision::Rejected, feedback),
                Err(VerificationError::MissingFeedback)
            );
        }
    }

    #[test]
    fn rejection_records_feedback_and_clears_verified_flag() {
        let outcome = review(
            PendingAdminApproval,
            ReviewDecision::Rejected,
            Some("  ICAI number does not match  "),
        )
        .unwrap();
        assert_eq!(outcome.status, Rejected);
        assert!(!outcome.is_verified);
        assert_eq!(outcome.admin_feedback.as_deref(), Some("ICAI number does not match"));
    }

    #[test]
    fn repeating_a_decision_is_idempotent() {
        let first = review(PendingAdminApproval, ReviewDecision::Rejected, Some("blurry scan")).unwrap();
        let second = review(first.status, ReviewDecision::Rejected, Some("blurry scan")).unwrap();

        assert_eq!(second.status, first.status);
        assert_eq!(second.admin_feedback, first.admin_feedback);
        assert!(!second.changed);

        let approved = review(PendingAdminApproval, ReviewDecision::Verified, Some("ok")).unwrap();
        let again = review(approved.status, ReviewDecision::Verified, Some("ok")).unwrap();
        assert_eq!(again.status, Verified);
        assert_eq!(again.admin_feedback.as_deref(), Some("ok"));
    }

    #[test]
    fn terminal_decisions_cannot_be_flipped() {
        assert_eq!(
            review(Rejected, ReviewDecision::Verified, None),
            Err(VerificationError::ConflictingDecision {
                current: Rejected,
                requested: Verified
            })
        );
        assert!(review(Verified, ReviewDecision::Rejected, Some("changed my mind")).is_err());
    }

    #[test]
    fn profiles_must_be_queued_before_review() {
        assert_eq!(
            review(Unverified, ReviewDecision::Verified, None),
            Err(VerificationError::NotAwaitingReview(Unverified))
        );
        assert_eq!(
            review(EmailVerified, ReviewDecision::Verified, None),
            Err(VerificationError::NotAwaitingReview(EmailVerified))
        );
    }

    #[test]
    fn review_queue_lists_undecided_profiles_oldest_first() {
        let mut newer = profile("newer", PendingAdminApproval, 0.0);
        newer.created_at = epoch(50);
        let older = profile("older", Unverified, 0.0);
        let done = profile("done", Verified, 0.0);
        let gone = profile("gone", Rejected, 0.0);

        let queue = review_queue(vec![newer, done, older, gone]);
        let ids: Vec<&str> = queue.iter().map(|entry| entry.profile.id.as_str()).collect();
        assert_eq!(ids, vec!["older", "newer"]);
    }

    #[test]
    fn review_queue_marks_only_pending_profiles_as_decidable() {
        let queue = review_queue(vec![
            profile("fresh", Unverified, 0.0),
            profile("mailed", EmailVerified, 0.0),
            profile("waiting", PendingAdminApproval, 0.0),
        ]);

        for entry in &queue {
            let decidable = review(entry.profile.verification_status, ReviewDecision::Verified, None).is_ok();
            assert_eq!(entry.awaiting_decision, decidable, "{}", entry.profile.id);
        }
        assert_eq!(queue.iter().filter(|entry| entry.awaiting_decision).count(), 1);

        let json = serde_json::to_value(&queue[2]).unwrap();
        assert_eq!(json["id"], "waiting");
        assert_eq!(json["awaitingDecision"], true);
    }
}
