pub mod shift;
pub mod user;

pub use shift::Entity as Shift;
pub use user::Entity as User;
