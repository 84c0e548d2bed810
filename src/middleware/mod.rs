pub mod recover_panic;
pub mod request_context;

pub use recover_panic::recover_panic;
pub use request_context::{PathParams, RequestContext};
