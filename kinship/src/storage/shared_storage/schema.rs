//! Schema initialization and management for SharedStorage

use crate::storage::errors::StorageError;
use surrealdb::{Connection, Surreal};

/// Tables defined at startup
pub const FIXED_TABLES: &[&str] = &[
    "user",
    "session",
    "post",
    "notification",
    "time_restriction",
    "screen_time",
];

/// Initialize the fixed tables and their indexes
pub async fn initialize_schema<C>(client: &Surreal<C>) -> Result<(), StorageError>
where
    C: Connection,
{
    let account_tables = r#"
        DEFINE TABLE IF NOT EXISTS user SCHEMALESS
        COMMENT "User accounts";
        DEFINE INDEX IF NOT EXISTS user_username_idx ON user FIELDS username UNIQUE;

        DEFINE TABLE IF NOT EXISTS session SCHEMALESS
        COMMENT "Login sessions";
        DEFINE INDEX IF NOT EXISTS session_user_idx ON session FIELDS user_id;
    "#;

    let content_tables = r#"
        DEFINE TABLE IF NOT EXISTS post SCHEMALESS
        COMMENT "Posts written by users";
        DEFINE INDEX IF NOT EXISTS post_author_idx ON post FIELDS author_id;

        DEFINE TABLE IF NOT EXISTS notification SCHEMALESS
        COMMENT "Notifications delivered to users";
        DEFINE INDEX IF NOT EXISTS notification_user_idx ON notification FIELDS user_id;
    "#;

    let screen_time_tables = r#"
        DEFINE TABLE IF NOT EXISTS time_restriction SCHEMALESS
        COMMENT "Per-feature usage limits";
        DEFINE INDEX IF NOT EXISTS time_restriction_pair_idx ON time_restriction
            FIELDS user_id, feature UNIQUE;

        DEFINE TABLE IF NOT EXISTS screen_time SCHEMALESS
        COMMENT "Per-feature usage counters";
        DEFINE INDEX IF NOT EXISTS screen_time_user_idx ON screen_time FIELDS user_id;
    "#;

    for (name, query) in [
        ("account", account_tables),
        ("content", content_tables),
        ("screen time", screen_time_tables),
    ] {
        client
            .query(query)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to define {} tables: {}", name, e)))?
            .check()
            .map_err(|e| StorageError::Query(format!("Failed to define {} tables: {}", name, e)))?;
    }

    tracing::debug!("Schema initialized");
    Ok(())
}

/// Define a relationship collection with lookup indexes on both parties.
///
/// With `unique_pair` set, the ordered (from, to) pair is also unique.
pub async fn define_relationship_collection<C>(
    client: &Surreal<C>,
    collection: &str,
    unique_pair: bool,
) -> Result<(), StorageError>
where
    C: Connection,
{
    validate_collection_name(collection)?;

    let pair_index = if unique_pair {
        format!(
            "DEFINE INDEX IF NOT EXISTS {0}_pair_idx ON {0} FIELDS from_id, to_id UNIQUE;",
            collection
        )
    } else {
        format!(
            "DEFINE INDEX IF NOT EXISTS {0}_pair_idx ON {0} FIELDS from_id, to_id;",
            collection
        )
    };

    let query = format!(
        r#"
        DEFINE TABLE IF NOT EXISTS {0} SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS {0}_from_idx ON {0} FIELDS from_id;
        DEFINE INDEX IF NOT EXISTS {0}_to_idx ON {0} FIELDS to_id;
        {1}
        "#,
        collection, pair_index
    );

    client
        .query(query)
        .await
        .map_err(|e| StorageError::Query(format!("Failed to define {}: {}", collection, e)))?
        .check()
        .map_err(|e| StorageError::Query(format!("Failed to define {}: {}", collection, e)))?;

    Ok(())
}

/// Collection names are interpolated into DEFINE statements, so only plain
/// identifiers that do not shadow a fixed table are accepted.
pub fn validate_collection_name(name: &str) -> Result<(), StorageError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid_start || !valid_rest {
        return Err(StorageError::Validation(format!(
            "Invalid collection name '{}'",
            name
        )));
    }

    if FIXED_TABLES.contains(&name) {
        return Err(StorageError::Validation(format!(
            "Collection name '{}' is reserved",
            name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_names() {
        assert!(validate_collection_name("follow_requests").is_ok());
        assert!(validate_collection_name("monitorRelations").is_ok());
        assert!(validate_collection_name("_private").is_ok());

        assert!(validate_collection_name("").is_err());
        assert!(validate_collection_name("1follow").is_err());
        assert!(validate_collection_name("follow requests").is_err());
        assert!(validate_collection_name("follow;DELETE user").is_err());
        assert!(validate_collection_name("user").is_err());
    }
}
