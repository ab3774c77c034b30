//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. When a migration
//! changes a table, update the matching block here (`diesel print-schema`
//! against a migrated database produces them).

diesel::table! {
    /// Question categories. `category_name` is unique.
    categories (id) {
        id -> Uuid,
        category_name -> Varchar,
        img -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registered accounts. `username` and `email` are each unique.
    accounts (id) {
        id -> Uuid,
        username -> Varchar,
        email -> Varchar,
        /// Argon2id PHC string; never the raw password.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Poll questions. A question is published once `publish_at <= now`.
    questions (id) {
        id -> Uuid,
        category_id -> Uuid,
        owner_id -> Uuid,
        question_text -> Varchar,
        publish_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Answer options. `position` keeps ballot order within a question.
    choices (id) {
        id -> Uuid,
        question_id -> Uuid,
        choice_text -> Varchar,
        votes -> Int4,
        position -> Int4,
    }
}

diesel::table! {
    /// One row per (question, voter); the unique constraint is the
    /// single-vote guarantee.
    votes (id) {
        id -> Uuid,
        question_id -> Uuid,
        choice_id -> Uuid,
        voter_id -> Uuid,
        cast_at -> Timestamptz,
    }
}

diesel::joinable!(questions -> categories (category_id));
diesel::joinable!(questions -> accounts (owner_id));
diesel::joinable!(choices -> questions (question_id));

diesel::allow_tables_to_appear_in_same_query!(accounts, categories, choices, questions, votes);
