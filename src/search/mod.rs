mod closed_list;
pub mod decision;
mod domain;
mod driver;
mod expansion;
mod learning;
mod node;
mod open_list;
mod result;

pub use decision::DecisionModuleName;
pub use domain::{Cost, Domain};
pub use driver::{Driver, ExpansionModuleName};
pub use result::SearchResult;
