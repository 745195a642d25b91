//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod item;
pub mod list;
pub mod result;
mod user;

pub use item::{Item, Unit};
pub use list::{default_name, format_long_date, format_money, total, List};
pub use user::User;
