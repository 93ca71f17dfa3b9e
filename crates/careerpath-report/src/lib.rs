//! careerpath-report — rendering careerpath data for people.
//!
//! Text views for the terminal and a self-contained HTML roadmap page.

pub mod html;
pub mod views;
