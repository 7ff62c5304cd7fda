pub mod collection;
pub mod reset_password;

pub use collection::get as list_get;
pub use collection::post as create_post;
pub use reset_password::put as reset_password_put;
