//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; regenerate
//! with `diesel print-schema` after a schema change.

diesel::table! {
    /// Registered accounts. `username` and `email` carry UNIQUE
    /// constraints; `role` stores the closed role enumeration as text.
    users (id) {
        id -> Int4,
        #[max_length = 64]
        username -> Varchar,
        #[max_length = 120]
        email -> Varchar,
        #[max_length = 128]
        password_hash -> Varchar,
        #[max_length = 20]
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Job postings, owned by the employer in `user_id`.
    jobs (id) {
        id -> Int4,
        #[max_length = 100]
        title -> Varchar,
        description -> Text,
        #[max_length = 50]
        salary -> Nullable<Varchar>,
        #[max_length = 100]
        location -> Varchar,
        #[max_length = 100]
        company -> Varchar,
        user_id -> Int4,
        date_posted -> Timestamptz,
    }
}

diesel::table! {
    /// Applications. UNIQUE (user_id, job_id) backstops the duplicate
    /// pre-check; job deletion cascades here.
    applications (id) {
        id -> Int4,
        cover_letter -> Text,
        #[max_length = 20]
        status -> Varchar,
        job_id -> Int4,
        user_id -> Int4,
        date_applied -> Timestamptz,
    }
}

diesel::joinable!(jobs -> users (user_id));
diesel::joinable!(applications -> jobs (job_id));

diesel::allow_tables_to_appear_in_same_query!(users, jobs, applications);
