use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Select};

use crate::auth::AuthStaff;

/// Store visibility scope derived from the authenticated staff member.
///
/// `All` means no filtering is applied. Staff with no profile or no home
/// store assignment fall back to full visibility rather than an empty
/// result set, so a missing assignment never locks anyone out of data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreScope {
    All,
    Store(i64),
}

impl StoreScope {
    pub fn for_staff(staff: &AuthStaff) -> Self {
        match staff.store_filter() {
            Some(store_id) => StoreScope::Store(store_id),
            None => StoreScope::All,
        }
    }

    /// The store id this scope restricts to, if any.
    pub fn store_id(&self) -> Option<i64> {
        match self {
            StoreScope::All => None,
            StoreScope::Store(id) => Some(*id),
        }
    }

    /// Whether a record belonging to `store_id` is visible under this scope.
    /// Records with no store link are always visible.
    pub fn allows(&self, store_id: Option<i64>) -> bool {
        match (self, store_id) {
            (StoreScope::All, _) => true,
            (_, None) => true,
            (StoreScope::Store(scope), Some(record)) => *scope == record,
        }
    }
}

impl From<&AuthStaff> for StoreScope {
    fn from(staff: &AuthStaff) -> Self {
        StoreScope::for_staff(staff)
    }
}

/// Query extension that narrows a select to the caller's store scope.
pub trait ScopedQuery<E: EntityTrait>: Sized {
    /// Filters by the given store column when the scope names a store.
    fn scoped_to<C: ColumnTrait>(self, column: C, scope: StoreScope) -> Self;
}

impl<E: EntityTrait> ScopedQuery<E> for Select<E> {
    fn scoped_to<C: ColumnTrait>(self, column: C, scope: StoreScope) -> Self {
        match scope {
            StoreScope::All => self,
            StoreScope::Store(store_id) => self.filter(column.eq(store_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::staff_profile::StaffRole;

    fn staff(role: StaffRole, store_id: Option<i64>) -> AuthStaff {
        AuthStaff {
            staff_id: 1,
            username: "t".into(),
            role,
            store_id,
        }
    }

    #[test]
    fn admin_scope_is_unrestricted() {
        let scope = StoreScope::for_staff(&staff(StaffRole::Admin, Some(2)));
        assert_eq!(scope, StoreScope::All);
        assert!(scope.allows(Some(9)));
    }

    #[test]
    fn unassigned_staff_scope_is_unrestricted() {
        let scope = StoreScope::for_staff(&staff(StaffRole::Staff, None));
        assert_eq!(scope, StoreScope::All);
    }

    #[test]
    fn assigned_staff_scope_restricts_to_home_store() {
        let scope = StoreScope::for_staff(&staff(StaffRole::Staff, Some(3)));
        assert_eq!(scope, StoreScope::Store(3));
        assert!(scope.allows(Some(3)));
        assert!(!scope.allows(Some(4)));
    }

    #[test]
    fn records_without_store_link_are_always_visible() {
        assert!(StoreScope::Store(3).allows(None));
    }
}
