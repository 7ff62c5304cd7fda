pub mod policy;
pub mod user;

pub use policy::PolicyRecord;
pub use user::{User, UserSummary};
