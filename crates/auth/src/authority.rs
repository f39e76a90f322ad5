use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use provreg_core::Principal;

/// External authority-verification service.
///
/// Answers whether `identity` is an eligible product creator. Structurally
/// infallible: an unreachable or unknown identity is simply not verified.
pub trait AuthorityVerifier: Send + Sync {
    fn is_verified_authority(&self, identity: &Principal) -> bool;
}

impl<V> AuthorityVerifier for Arc<V>
where
    V: AuthorityVerifier + ?Sized,
{
    fn is_verified_authority(&self, identity: &Principal) -> bool {
        (**self).is_verified_authority(identity)
    }
}

/// Fixed set of verified identities, decided at construction time.
#[derive(Debug, Clone, Default)]
pub struct AllowList(HashSet<Principal>);

impl AllowList {
    pub fn new(identities: impl IntoIterator<Item = Principal>) -> Self {
        Self(identities.into_iter().collect())
    }
}

impl AuthorityVerifier for AllowList {
    fn is_verified_authority(&self, identity: &Principal) -> bool {
        self.0.contains(identity)
    }
}

/// Mutable in-memory authority registry for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAuthoritySet {
    verified: RwLock<HashSet<Principal>>,
}

impl InMemoryAuthoritySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(identities: impl IntoIterator<Item = Principal>) -> Self {
        Self {
            verified: RwLock::new(identities.into_iter().collect()),
        }
    }

    pub fn grant(&self, identity: Principal) {
        if let Ok(mut set) = self.verified.write() {
            tracing::debug!(%identity, "authority granted");
            set.insert(identity);
        }
    }

    pub fn revoke(&self, identity: &Principal) {
        if let Ok(mut set) = self.verified.write() {
            tracing::debug!(%identity, "authority revoked");
            set.remove(identity);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut set) = self.verified.write() {
            set.clear();
        }
    }
}

impl AuthorityVerifier for InMemoryAuthoritySet {
    fn is_verified_authority(&self, identity: &Principal) -> bool {
        // A poisoned lock verifies no one.
        self.verified
            .read()
            .map(|set| set.contains(identity))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_and_revoke_toggle_verification() {
        let set = InMemoryAuthoritySet::new();
        let caller = Principal::from("ST1TEST");
        assert!(!set.is_verified_authority(&caller));

        set.grant(caller.clone());
        assert!(set.is_verified_authority(&caller));

        set.revoke(&caller);
        assert!(!set.is_verified_authority(&caller));
    }

    #[test]
    fn clear_removes_everyone() {
        let set = InMemoryAuthoritySet::with([Principal::from("A"), Principal::from("B")]);
        set.clear();
        assert!(!set.is_verified_authority(&Principal::from("A")));
        assert!(!set.is_verified_authority(&Principal::from("B")));
    }

    #[test]
    fn allow_list_works_through_arc() {
        let list: Arc<dyn AuthorityVerifier> = Arc::new(AllowList::new([Principal::from("ST1TEST")]));
        assert!(list.is_verified_authority(&Principal::from("ST1TEST")));
        assert!(!list.is_verified_authority(&Principal::from("ST2FAKE")));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: only granted identities verify.
            #[test]
            fn only_granted_identities_verify(
                granted in proptest::collection::hash_set("[A-Z0-9]{4,12}", 0..8),
                candidate in "[A-Z0-9]{4,12}"
            ) {
                let set = InMemoryAuthoritySet::with(granted.iter().cloned().map(Principal::from));
                prop_assert_eq!(
                    set.is_verified_authority(&Principal::from(candidate.clone())),
                    granted.contains(&candidate)
                );
            }
        }
    }
}
