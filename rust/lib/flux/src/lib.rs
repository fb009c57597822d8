//! Flux — view state for the profile screen.
//!
//! Rust owns the view model; a platform renderer (terminal, web, native)
//! subscribes to paths and draws whatever is stored there.
//!
//! # Path Addressing
//!
//! Flat namespace with `/` as separator:
//! - Global: `app/route`, `app/alert`
//! - Page: `profile/view`, `profile/form`, `profile/password-strength`
//!
//! Subscriptions accept MQTT-style wildcards (`+` one level, `#` the rest).
//!
//! # Example
//!
//! ```ignore
//! let store = StateStore::new();
//! store.subscribe("app/#", |path, value| println!("changed: {}", path));
//! store.set("app/route", AppRoute("/static/login.html".into()));
//! ```

pub mod pattern;
pub mod store;
pub mod value;

pub use store::{ChangeHandler, StateStore};
pub use value::StateValue;
