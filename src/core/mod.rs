// Core modules: error model, discriminator decoding, and response-body decoding.
pub mod body;
pub mod error;
pub mod variant;
