pub mod change_password;
pub mod me;

pub use change_password::change_password_post;
pub use me::me_get;
