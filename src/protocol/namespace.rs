use std::fmt;

use super::MessageError;

/// Name of a database; the first half of every collection namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatabaseNamespace {
    name: String,
}

impl DatabaseNamespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DatabaseNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Target of a request: a (database, collection) pair.
///
/// The names are carried as-is; checking them against server naming rules
/// is left to the connection layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionNamespace {
    database: DatabaseNamespace,
    collection_name: String,
}

impl CollectionNamespace {
    pub fn new(database: impl Into<String>, collection_name: impl Into<String>) -> Self {
        Self::with_database(DatabaseNamespace::new(database), collection_name)
    }

    pub fn with_database(database: DatabaseNamespace, collection_name: impl Into<String>) -> Self {
        Self {
            database,
            collection_name: collection_name.into(),
        }
    }

    /// Splits `"db.collection"` on the first dot.
    pub fn from_full_name(full_name: &str) -> Result<Self, MessageError> {
        match full_name.split_once('.') {
            Some((database, collection)) if !database.is_empty() && !collection.is_empty() => {
                Ok(Self::new(database, collection))
            }
            _ => Err(MessageError::InvalidArgument {
                name: "full_name",
                reason: format!("'{full_name}' is not of the form 'database.collection'"),
            }),
        }
    }

    pub fn database(&self) -> &DatabaseNamespace {
        &self.database
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.database.name, self.collection_name)
    }
}

impl fmt::Display for CollectionNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database.name, self.collection_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_joins_parts() {
        let ns = CollectionNamespace::new("database", "collection");

        assert_eq!(ns.database_name(), "database");
        assert_eq!(ns.collection_name(), "collection");
        assert_eq!(ns.full_name(), "database.collection");
        assert_eq!(ns.to_string(), "database.collection");
    }

    #[test]
    fn from_full_name_splits_on_first_dot() {
        let ns = CollectionNamespace::from_full_name("app.system.users").unwrap();

        assert_eq!(ns.database_name(), "app");
        assert_eq!(ns.collection_name(), "system.users");
    }

    #[test]
    fn from_full_name_rejects_malformed_input() {
        for input in ["nodot", ".collection", "database.", ""] {
            let err = CollectionNamespace::from_full_name(input).unwrap_err();
            assert_eq!(err.argument_name(), "full_name");
        }
    }

    #[test]
    fn with_database_shares_database_name() {
        let db = DatabaseNamespace::new("admin");
        let ns = CollectionNamespace::with_database(db.clone(), "users");

        assert_eq!(ns.database(), &db);
        assert_eq!(ns.full_name(), "admin.users");
        assert_eq!(db.to_string(), "admin");
    }
}
