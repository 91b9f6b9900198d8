//! Diesel table definitions for the PostgreSQL schema.
//!
//! Kept in sync by hand with `migrations/`. These definitions are internal to
//! the persistence layer.

diesel::table! {
    /// Registered users. `email` carries a unique constraint.
    users (id) {
        id -> Int4,
        #[max_length = 120]
        email -> Varchar,
        #[max_length = 80]
        first_name -> Varchar,
        #[max_length = 80]
        last_name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Address book entries owned by a user. No adapter reads or writes
    /// this table yet; it is created by the initial migration.
    contacts (id) {
        id -> Int4,
        user_id -> Nullable<Int4>,
        #[max_length = 80]
        first_name -> Varchar,
        #[max_length = 80]
        last_name -> Varchar,
        #[sql_name = "group"]
        #[max_length = 80]
        group_name -> Nullable<Varchar>,
        #[max_length = 80]
        phone_number -> Nullable<Varchar>,
        #[max_length = 120]
        street_address -> Varchar,
        #[max_length = 80]
        street_address_2 -> Nullable<Varchar>,
        #[max_length = 80]
        city -> Varchar,
        #[max_length = 80]
        state -> Varchar,
        #[max_length = 80]
        zipcode -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(contacts -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(contacts, users);
