//! Awesome-list loading and parsing

mod awesome_list;
mod loader;
mod parser;

pub use awesome_list::{AwesomeList, Entry, Rubric};
pub use loader::load_awesome_list;
