//! Typed client for the Grepper answers API.
//!
//! ```no_run
//! use client::{Client, ClientOptions};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientOptions::new("my-api-key"))?;
//! for answer in client.search("rust iterate hashmap", None).await? {
//!     println!("{} ({} upvotes)", answer.title, answer.upvotes);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architectural Layer
//!
//! **Orchestration.** Each operation builds a URL and request options, runs
//! them through [`pipeline::execute`] with the operation's schema, and
//! reshapes the validated value. Failures are returned as
//! [`ClassifiedError`], unchanged.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`answers`] | `Answer`, `AnswerList`, update types, `AnswerId`, schemas |
//! | [`config`] | `ClientOptions`, `ConfigError`, auth header |
//! | [`endpoints`] | Endpoint table and URL building |

pub mod answers;
mod client;
pub mod config;
pub mod endpoints;

pub use answers::{Answer, AnswerId, AnswerList, UpdateOutcome};
pub use client::{Client, DEFAULT_SIMILARITY};
pub use config::{ClientOptions, ConfigError, API_KEY_ENV, BASE_URL_ENV};
pub use endpoints::DEFAULT_BASE_URL;
pub use pipeline::{ClassifiedError, ErrorKind, ErrorReport, PipelineResult};
