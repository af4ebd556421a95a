pub use super::categories::Entity as Categories;
pub use super::tasks::Entity as Tasks;
pub use super::users::Entity as Users;
