pub mod prelude;

pub mod categories;
pub mod tasks;
pub mod users;
