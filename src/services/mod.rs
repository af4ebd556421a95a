pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, IssuedToken};
pub use auth_service_impl::SeaOrmAuthService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{CreateUser, UpdateUser, UserError, UserService};
pub use user_service_impl::SeaOrmUserService;

pub mod task_service;
pub mod task_service_impl;
pub use task_service::{CreateTask, TaskError, TaskService, UpdateTask};
pub use task_service_impl::SeaOrmTaskService;

pub mod category_service;
pub mod category_service_impl;
pub use category_service::{CategoryError, CategoryService, CreateCategory, UpdateCategory};
pub use category_service_impl::SeaOrmCategoryService;
