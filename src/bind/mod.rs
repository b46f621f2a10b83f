//! Binding of flat properties into configuration instances, and the
//! accounting of what a bind consumed.

mod binder;
mod error;
mod ledger;
mod property;

pub use binder::{BindingResult, ConfigBinder};
pub use error::{BindError, ConversionError, PropertyError, UnconsumedPropertyError};
pub use ledger::{reconcile, Ledger};
pub use property::PropertySet;
