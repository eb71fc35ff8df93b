//! # Customer Module
//!
//! Customer records: request shape, validation, mapping to the persisted
//! shape, partition selection and the service composing them over a store.

pub mod mapper;
pub mod model;
pub mod partition;
pub mod request;
pub mod service;
pub mod validator;

pub use mapper::to_record;
pub use model::{Customer, ProfilePic};
pub use partition::PartitionResolver;
pub use request::{CustomerRequest, ProfilePicRequest};
pub use service::{CustomerService, DeleteOutcome};
pub use validator::{validate, ValidatedRequest, ValidationErrors, Violation};
