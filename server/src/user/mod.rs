mod group;
mod user;
mod user_manager;

pub use group::Group;
pub use user::User;
pub use user_manager::{UserManager, DEFAULT_GUEST_TEMPLATE};
