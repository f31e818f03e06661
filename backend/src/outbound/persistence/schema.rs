//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match the deployed migrations exactly; regenerate with
//! `diesel print-schema` after schema changes.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Unique login name used for message addressing.
        username -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Role assignments, one row per user per role.
    user_roles (user_id, role) {
        /// User holding the role.
        user_id -> Uuid,
        /// Role name, e.g. `agent` or `manager`.
        role -> Varchar,
    }
}

diesel::table! {
    /// Permission grants attached to roles.
    role_permissions (role, permission) {
        /// Role the permission is granted to.
        role -> Varchar,
        /// Permission name, e.g. `tickets.manage`.
        permission -> Varchar,
    }
}

diesel::table! {
    /// Direct messages between users.
    messages (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Authoring user.
        sender_id -> Uuid,
        /// Addressed user.
        receiver_id -> Uuid,
        /// Message body.
        content -> Text,
        /// Optional attachment location.
        attachment_url -> Nullable<Text>,
        /// Whether the receiver has read the message.
        read -> Bool,
        /// Persist timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user notifications.
    notifications (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Addressed user.
        user_id -> Uuid,
        /// Short headline.
        title -> Varchar,
        /// Notification body.
        message -> Text,
        /// Severity: `info`, `success`, `warning`, or `error`.
        kind -> Varchar,
        /// Optional in-app link target.
        link -> Nullable<Text>,
        /// Whether the user has read the notification.
        read -> Bool,
        /// Persist timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Property listings managed by the platform.
    properties (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Lifecycle status, `available` counts toward availability.
        status -> Varchar,
    }
}

diesel::table! {
    /// Partner agencies.
    agencies (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
    }
}

diesel::table! {
    /// Construction and renovation projects.
    projects (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Lifecycle status, `active` counts toward active projects.
        status -> Varchar,
    }
}

diesel::table! {
    /// Financial ledger entries.
    transactions (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Entry direction: `income` or `expense`.
        kind -> Varchar,
        /// Amount in integer cents.
        amount_cents -> Int8,
        /// Entry timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Support tickets raised by staff and clients.
    support_tickets (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Lifecycle status, `open` counts toward the open total.
        status -> Varchar,
    }
}

diesel::table! {
    /// Client records.
    clients (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, user_roles, role_permissions);
