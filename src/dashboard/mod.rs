#[allow(clippy::module_inception)]
pub mod dashboard;
pub mod inputs;
pub mod memo;
pub mod view;
