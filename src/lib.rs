extern crate itertools;
extern crate rand;
#[macro_use]
extern crate serde_derive;

pub mod accumulator;
pub mod activator;
pub mod config;
pub mod error;
pub mod feed_forward;
pub mod forward;
pub mod gradient;
pub mod memo;
pub mod trainer;

mod layer;
mod node;
mod utils;

pub use crate::error::{Error, Result};
