//! Eligibility: may a candidate fill a role at all?

use crate::model::{Candidate, Role, Vocabulary};

/// Decides `permit(candidate, role)` against a vocabulary.
///
/// A candidate is eligible when they are available for at least one session
/// the role carries and hold no veto on any attribute the role carries.
/// Vetoes on attributes the role does not carry are ignored.
///
/// # Examples
///
/// ```
/// use u_casting::eligibility::Eligibility;
/// use u_casting::model::{Candidate, Preference, Role, Vocabulary};
///
/// let vocab = Vocabulary::new().with_sessions(["friEve"]).with_traits(["spy", "liar"]);
/// let role = Role::new("zeus", ["friEve", "spy"]);
/// let ana = Candidate::new("ana")
///     .with_availability(["friEve"])
///     .with_preference("liar", Preference::Veto);
/// assert!(Eligibility::new(&vocab).permit(&ana, &role));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Eligibility<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> Eligibility<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn permit(&self, candidate: &Candidate, role: &Role) -> bool {
        let available = role
            .sessions(self.vocabulary)
            .any(|s| candidate.is_available(s));
        if !available {
            return false;
        }
        !role
            .attributes
            .iter()
            .any(|a| candidate.preference(a).is_veto())
    }
}
