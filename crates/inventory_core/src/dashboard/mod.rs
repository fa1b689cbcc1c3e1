//! Presentation controller for the inventory dashboard.
//!
//! # Responsibility
//! - Validate form input and decide which storage call a gesture maps to.
//! - Keep the controller independent of any rendering toolkit.
//!
//! # See also
//! - `inventory_cli` for the terminal view.

pub mod driver;
pub mod form;
pub mod state;
