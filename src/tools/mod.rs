// Page pipeline tools, leaves first
pub mod batch;
pub mod clean;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod parse;
pub mod script;
