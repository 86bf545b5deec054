#![deny(unsafe_code)]

#[cfg(test)]
mod tests;

mod hasher;
mod layout;

pub mod error;
pub mod geometry;
pub mod gui;
pub mod node;
pub mod nodeid;
pub mod storage;
pub mod tree;
pub mod units;

pub use kurbo;
pub use log;

/// The public API
pub mod prelude {
    pub use crate::id;

    #[doc(inline)]
    pub use crate::error::*;

    #[doc(inline)]
    pub use crate::geometry::*;

    #[doc(inline)]
    pub use crate::gui::*;

    #[doc(inline)]
    pub use crate::node::*;

    #[doc(inline)]
    pub use crate::nodeid::*;

    #[doc(inline)]
    pub use crate::storage::*;

    #[doc(inline)]
    pub use crate::tree::*;

    #[doc(inline)]
    pub use crate::units::*;
}
