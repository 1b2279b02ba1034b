pub mod builders;
pub mod db;

pub use builders::{ShiftBuilder, UserBuilder};
pub use db::TestDb;
