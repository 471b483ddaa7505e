// Moderated Posts API - core library
//
// Backend for a moderated social posting service: users create posts and
// comments in `pending` status, an asynchronous pipeline classifies them via
// an external LLM and flips them to `approved` or `blocked`, and approved
// comments can trigger a delayed AI-generated reply from the post's author.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
