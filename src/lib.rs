pub mod annotations;
pub mod controls;
pub mod dataset;
pub mod fields;
pub mod hierarchy;
pub mod label;
pub mod pipeline;
pub mod search;
pub mod util;
