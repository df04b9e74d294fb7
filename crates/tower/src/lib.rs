//! Tower Generator: deterministic placement of blocks in courses of three.
//!
//! # Invariants
//! - Layout is a pure function of block count and size.
//! - Courses alternate orientation, starting rotated at course 0.
//! - Every position component is rounded to one decimal place.

mod layout;

pub use layout::{COURSE_SIZE, LayoutRecord, TowerConfig, generate_layout, tower_height};
