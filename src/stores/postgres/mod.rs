//! PostgreSQL-backed stores. Each store holds its own clone of the pool handed
//! out by [`crate::database::DatabaseManager`]. Deletes are soft: rows get a
//! `deleted_at` timestamp and every read filters on `deleted_at IS NULL`.

mod item;
mod list;
mod membership;
mod user;

pub use item::PgItemStore;
pub use list::PgListStore;
pub use membership::PgMembershipStore;
pub use user::PgUserStore;
