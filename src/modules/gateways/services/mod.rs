pub mod payu_client;
pub mod registry;
pub mod token_manager;

pub use payu_client::{resolve_url_template, PayuClient};
pub use registry::{ProcessorInfo, ProcessorRegistry};
pub use token_manager::{AccessToken, TokenManager, EXPIRY_MARGIN};
