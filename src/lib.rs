#![warn(clippy::all)]
#![doc = include_str!("../README.md")]

// Modules that make up the Superstore View library.
mod aggregate;
mod args;
mod error;
mod export;
mod file_dialog;
mod file_extension;
mod filters;
mod layout;
mod loader;
mod session;
mod table;
mod temporal;
mod traits;

// Publicly expose the contents of these modules.
pub use self::{
    aggregate::*,
    args::Arguments,
    error::*,
    export::*,
    file_dialog::*,
    file_extension::*,
    filters::*,
    layout::*,
    loader::*,
    session::*,
    table::*,
    temporal::*,
    traits::*,
};
