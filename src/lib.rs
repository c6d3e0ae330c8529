//! laptop-price: price prediction for laptop specifications.
//!
//! The crate loads two artifacts once at startup: a reference dataset,
//! from which the choice lists of the categorical fields are derived, and a
//! trained regression model. It then turns [`LaptopRecord`]s into
//! formatted [`PriceQuote`]s.
//!
//! ```no_run
//! use laptop_price::{presets, service};
//!
//! let ctx = service::load("dataset/cleaned_data.csv", "laptop_price_model.json")?;
//! let quote = ctx.predict(&presets::hp_victus())?;
//! println!("{quote}");
//! # Ok::<(), laptop_price::Error>(())
//! ```
//!
//! The model sits behind the [`Regressor`] trait; [`model::PipelineModel`]
//! is the JSON-serialized backend shipped with the crate.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod presets;
pub mod quote;
pub mod record;
pub mod reference;
pub mod service;
pub mod utils;

#[doc(hidden)]
pub mod testing;

pub use config::{Config, DomainPolicy};
pub use error::{ArtifactError, ArtifactKind, Error, InferenceError, Result};
pub use model::Regressor;
pub use quote::PriceQuote;
pub use record::{Column, LaptopRecord};
pub use reference::CategoricalDomains;
pub use service::Context;
