pub mod processor;
pub mod signature;
pub mod state_machine;

pub use processor::PayuProcessor;
pub use signature::{SignatureAlgorithm, SignatureHeader, SignatureVerifier, SIGNATURE_HEADERS};
