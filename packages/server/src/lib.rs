// Evolvo.uz - API Core
//
// Backend for the Evolvo.uz marketing site: the scheduled blog publishing
// pipeline (topics -> content -> image -> scheduled post -> sweep -> Telegram),
// the public read API, the service catalogue and order intake.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
