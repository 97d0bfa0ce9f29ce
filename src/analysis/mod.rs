pub mod derive;
pub mod summarize;
