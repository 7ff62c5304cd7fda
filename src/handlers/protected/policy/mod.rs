// handlers/protected/policy - one set of handlers for every policy type.
// The type is injected per route as an `Extension<PolicyType>`.
pub mod collection;
pub mod record;

pub use collection::get as collection_get;
pub use collection::post as collection_post;
pub use record::delete as record_delete;
pub use record::put as record_put;
