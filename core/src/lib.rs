#![no_std]

extern crate alloc;

pub use board::*;
pub use card::*;
pub use collab::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use persistence::*;
pub use scheduler::*;
pub use session::*;
pub use timer::*;
pub use types::*;

mod board;
mod card;
mod collab;
mod config;
mod engine;
mod error;
mod generator;
mod persistence;
mod scheduler;
mod session;
mod timer;
mod types;
