//! Cache keys.
//!
//! A key pairs the entity kind with the record id, so two kinds that happen
//! to share an id never collide in one backend.

use std::fmt;

use super::traits::CacheableEntity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    entity: &'static str,
    id: i64,
}

impl CacheKey {
    /// Key for entity type `T` with the given id.
    pub fn of<T: CacheableEntity>(id: T::Id) -> Self {
        Self {
            entity: T::entity_name(),
            id: id.into(),
        }
    }

    /// Key for a concrete entity instance.
    pub fn for_entity<T: CacheableEntity>(entity: &T) -> Self {
        Self::of::<T>(entity.entity_id())
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn id(&self) -> i64 {
        self.id
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{User, UserId};

    #[test]
    fn test_key_for_entity_matches_key_of_id() {
        let user = User::new(UserId::new(12));
        let key = CacheKey::for_entity(&user);

        assert_eq!(key, CacheKey::of::<User>(UserId::new(12)));
        assert_eq!(key.entity(), "user");
        assert_eq!(key.id(), 12);
        assert_eq!(key.to_string(), "user:12");
    }
}
