pub mod list;
pub mod list_item;
pub mod user;
pub mod user_list;

pub use list::{JoinListRequest, List, ListRequest, ListWithItems, NewList};
pub use list_item::{ItemIdsRequest, ListItem, ListItemRequest, NewListItem, UpdateListItemRequest};
pub use user::{LoginRequest, NewUser, SignUpRequest, User, UserRole};
pub use user_list::{NewUserList, UserList, UserListRequest};
