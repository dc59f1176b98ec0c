//! The per-wave toolchain stages.
//!
//! Each submodule drives one external tool through a `CommandRunner`:
//! preprocessing the spec, wrapping raw includes, assembling the entry
//! point, linking, and flattening the linked object to raw bytes.

pub mod binarize;
pub mod entry;
pub mod link;
pub mod preprocess;
pub mod rawobject;
