//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`.
//! Regenerate with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` carries a unique index.
    users (id) {
        id -> Int8,
        email -> Varchar,
        /// PHC-format Argon2id digest.
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Todo items. Rows cascade-delete with their owner.
    todos (id) {
        id -> Int8,
        user_id -> Int8,
        title -> Varchar,
        description -> Text,
        image_url -> Nullable<Text>,
        /// One of `Pending`, `In Progress`, `Done` (CHECK constraint).
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(todos -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(todos, users);
