//! Fleet back-office: typed access to the fleet REST backend plus the
//! reference resolution and assignment rules the console is built on.

pub mod boards;
pub mod client;
pub mod config;
pub mod error;
pub mod filters;
pub mod forms;
pub mod guard;
pub mod labels;
pub mod models;
pub mod resolver;
pub mod session;
pub mod wire;

pub use client::FleetClient;
pub use config::Config;
pub use error::{FleetError, Result};
pub use session::{Session, SessionStore};
