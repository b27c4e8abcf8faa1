//! Commands Layer
//!
//! Operations a presentation layer calls, bridging user actions to the
//! repositories, the preference store and the derivation pipeline.

mod category_cmd;
mod data_cmd;
mod photo_cmd;
mod product_cmd;
mod settings_cmd;
mod view_cmd;


pub use category_cmd::*;
pub use data_cmd::*;
pub use photo_cmd::*;
pub use product_cmd::*;
pub use settings_cmd::*;
pub use view_cmd::*;
