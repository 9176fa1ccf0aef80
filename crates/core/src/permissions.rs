//! Store deletion rule.
//!
//! This is the one non-trivial business rule in the system, so it lives
//! here as a pure function rather than inline in a request handler. Both
//! the HTML delete workflow and the JSON APIs consult it.

use crate::types::UserId;

/// Decide whether a user may delete a store.
///
/// Returns true when any of:
/// - the store has no owner (unowned/legacy stores are deletable by any
///   authenticated user; a deliberate policy, unusual as it looks),
/// - the acting user owns the store,
/// - the acting user holds the global delete-stores grant.
///
/// Callers are expected to have already established that the acting user
/// is authenticated; the delete endpoints require a signed-in user before
/// this rule is ever consulted.
#[must_use]
pub const fn can_user_delete(owner: Option<UserId>, user: UserId, can_delete_any: bool) -> bool {
    match owner {
        None => true,
        Some(owner) => owner.as_i64() == user.as_i64() || can_delete_any,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: UserId = UserId::new(1);
    const BOB: UserId = UserId::new(2);

    #[test]
    fn unowned_store_is_deletable_by_anyone() {
        assert!(can_user_delete(None, ALICE, false));
        assert!(can_user_delete(None, BOB, true));
    }

    #[test]
    fn owner_can_delete_own_store() {
        assert!(can_user_delete(Some(ALICE), ALICE, false));
    }

    #[test]
    fn non_owner_without_grant_cannot_delete() {
        assert!(!can_user_delete(Some(ALICE), BOB, false));
    }

    #[test]
    fn global_grant_overrides_ownership() {
        assert!(can_user_delete(Some(ALICE), BOB, true));
    }

    #[test]
    fn kennedy_and_mcdonalds_scenarios() {
        // "Kennedy" was created anonymously and has no owner: anyone may
        // delete it.
        assert!(can_user_delete(None, BOB, false));

        // "McDonald's" is owned by Alice: Bob may only delete it with the
        // global grant.
        assert!(!can_user_delete(Some(ALICE), BOB, false));
        assert!(can_user_delete(Some(ALICE), BOB, true));
        assert!(can_user_delete(Some(ALICE), ALICE, false));
    }
}
