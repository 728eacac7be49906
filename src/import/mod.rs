//! Resource import: fetch, normalize and print remote resources as kennel
//! declarations.

pub mod error;
pub mod importer;
pub mod normalizer;
pub mod printer;

pub use importer::Importer;
