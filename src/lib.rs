//---------------------------------------
pub mod models;
pub mod error;
//---------------------------------------

//---------------------------------------
pub mod store;
pub mod persist;
pub mod seed;
pub mod ledger;
//---------------------------------------

//---------------------------------------
pub mod remote;
pub mod balancer;
pub mod service;
//---------------------------------------

//---------------------------------------
pub mod session;
pub mod summary;
pub mod settings;
//---------------------------------------

//---------------------------------------
pub mod api;
//---------------------------------------

pub use error::{ServiceError, ServiceResult};
pub use ledger::{Ledger, StatusPolicy};
pub use service::{Context, DeclineOutcome, OfficeService, Sourced};
pub use settings::Settings;
