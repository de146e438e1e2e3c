//! Core store types and logic.
//!
//! This module contains the pure core of the cities store:
//! - City records and the canonical `CityId`
//! - The `CitiesState` snapshot and the closed `Action` set
//! - The transition function and the generic `Store` around it
//! - Immutable dispatch history and the snapshot audit
//!
//! Nothing in here touches storage; persistence lives in the provider.

mod action;
mod audit;
mod city;
mod history;
mod reducer;
mod state;
mod store;

pub use action::{Action, ActionError, ACTION_KINDS};
pub use audit::{audit, violations, Violation};
pub use city::{City, CityId, ParseCityIdError, Position};
pub use history::{DispatchRecord, History};
pub use reducer::{reduce, replay, CitiesReducer, Reducer};
pub use state::CitiesState;
pub use store::Store;
