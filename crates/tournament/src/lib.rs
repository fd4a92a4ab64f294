//! Round-robin tournament runner for capture-the-flag agents
//!
//! This crate provides infrastructure for:
//! - Qualifying submissions from the grader's roster and an allow-list
//! - Pairing every qualified team against every other team once
//! - Playing pairings sequentially or on a worker pool
//! - Building the score board and match board tables
//!
//! # Usage
//!
//! ```bash
//! # Four workers, three repeats of every layout
//! cargo run -p tournament -- -s ./graded -l ./names.txt -n 4 -r 3
//!
//! # Dry run with the seeded simulator, first 8 qualified teams only
//! cargo run -p tournament -- -s ./graded -l ./names.txt --simulator seeded --num-teams 8
//! ```

mod config;
mod error;
mod match_runner;
mod pairing;
mod qualification;
mod report;
mod results;
mod roster;
mod scheduler;
mod simulator;
mod staging;

pub use config::*;
pub use error::*;
pub use match_runner::*;
pub use pairing::*;
pub use qualification::*;
pub use report::*;
pub use results::*;
pub use roster::*;
pub use scheduler::*;
pub use simulator::*;
pub use staging::*;
