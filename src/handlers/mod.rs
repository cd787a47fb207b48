// HTTP handlers, grouped by resource area. Handlers stay thin: extract the
// caller and payload, delegate to a service, convert the result to JSON (or
// CSV for the admin exports).

pub mod admin_topics;
pub mod admin_users;
pub mod admin_vocab;
pub mod auth;
pub mod me;
pub mod topics;
pub mod user_vocab;
pub mod vocab;

pub use admin_topics::{create_topic, delete_topic, export_topics, search_topics, update_topic};
pub use admin_users::{
    create_user, delete_user, export_users, list_users, reset_password, restore_user, update_user,
};
pub use admin_vocab::{approve_vocab, reject_vocab};
pub use auth::{login, register};
pub use me::{get_me, update_me};
pub use topics::{get_topic, list_topic_vocab, list_topics};
pub use user_vocab::{add_my_vocab, list_my_vocab, remove_my_vocab, update_my_vocab};
pub use vocab::{contribute_vocab, get_vocab, search_vocab};

/// Quotes a CSV field when it contains a delimiter, quote, or line break;
/// embedded quotes are doubled per RFC 4180.
pub(crate) fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
