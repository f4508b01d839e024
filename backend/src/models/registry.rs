//! Explicit model registration.
//!
//! Entities are defined first, associations second. Both lists keep their
//! insertion order, which is also the order tables are created in.

/// A registered entity and the table backing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDef {
    pub name: &'static str,
    pub table: &'static str,
}

/// One-to-many association from `parent` to `child` through `foreign_key`.
///
/// Children are deleted together with their parent (`ON DELETE CASCADE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Association {
    pub parent: &'static str,
    pub child: &'static str,
    pub foreign_key: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("entity '{0}' is defined more than once")]
    DuplicateEntity(&'static str),
    #[error("association {parent} -> {child} references undefined entity '{missing}'")]
    UndefinedEntity {
        parent: &'static str,
        child: &'static str,
        missing: &'static str,
    },
}

/// Ordered set of entity definitions and their associations.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    entities: Vec<EntityDef>,
    associations: Vec<Association>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry for the blog schema: `Post`, then `Comment`, then
    /// `Post has many Comment` with cascading delete.
    pub fn blog() -> Self {
        Self::new()
            .define(EntityDef {
                name: "Post",
                table: "posts",
            })
            .define(EntityDef {
                name: "Comment",
                table: "comments",
            })
            .associate(Association {
                parent: "Post",
                child: "Comment",
                foreign_key: "post_id",
            })
    }

    pub fn define(mut self, entity: EntityDef) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn associate(mut self, association: Association) -> Self {
        self.associations.push(association);
        self
    }

    /// Confirm that entity names are unique and every association points at
    /// defined entities.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for (idx, entity) in self.entities.iter().enumerate() {
            if self.entities[..idx].iter().any(|e| e.name == entity.name) {
                return Err(RegistryError::DuplicateEntity(entity.name));
            }
        }

        for assoc in &self.associations {
            for name in [assoc.parent, assoc.child] {
                if self.entity(name).is_none() {
                    return Err(RegistryError::UndefinedEntity {
                        parent: assoc.parent,
                        child: assoc.child,
                        missing: name,
                    });
                }
            }
        }

        Ok(())
    }

    pub fn entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn entities(&self) -> &[EntityDef] {
        &self.entities
    }

    /// Associations in which `parent` owns the children.
    pub fn children_of<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a Association> {
        self.associations.iter().filter(move |a| a.parent == parent)
    }

    /// Table names in registration order.
    pub fn table_order(&self) -> Vec<&'static str> {
        self.entities.iter().map(|e| e.table).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_registry_is_valid_and_ordered() {
        let registry = ModelRegistry::blog();
        assert!(registry.validate().is_ok());
        assert_eq!(registry.table_order(), vec!["posts", "comments"]);

        let children: Vec<_> = registry.children_of("Post").collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].child, "Comment");
        assert_eq!(children[0].foreign_key, "post_id");
        assert_eq!(registry.children_of("Comment").count(), 0);
    }

    #[test]
    fn test_association_to_undefined_entity_is_rejected() {
        let registry = ModelRegistry::new()
            .define(EntityDef {
                name: "Comment",
                table: "comments",
            })
            .associate(Association {
                parent: "Post",
                child: "Comment",
                foreign_key: "post_id",
            });

        assert_eq!(
            registry.validate(),
            Err(RegistryError::UndefinedEntity {
                parent: "Post",
                child: "Comment",
                missing: "Post",
            })
        );
    }

    #[test]
    fn test_duplicate_entity_is_rejected() {
        let def = EntityDef {
            name: "Post",
            table: "posts",
        };
        let registry = ModelRegistry::new().define(def).define(def);
        assert_eq!(registry.validate(), Err(RegistryError::DuplicateEntity("Post")));
    }
}
