//! Protected data loading for the CredTrust confidential agent.
//!
//! The enclave runtime decrypts the requester's protected dataset into the
//! input directory. This crate decodes it into a [`ProtectedRecord`] and
//! applies the degrade-with-flag policy when it cannot.
//!
//! [`ProtectedRecord`]: credtrust_core::ProtectedRecord

pub mod error;
pub mod loader;

pub use error::DataIntegrityError;
pub use loader::{
    decode_record, synthetic_record, DataProvenance, LoadedRecord, ProtectedDataLoader,
    SYNTHETIC_ADDRESS,
};
