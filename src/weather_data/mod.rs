pub mod cache;
pub mod error;
pub mod fetcher;
pub mod open_meteo;
pub mod query;
pub mod retry;
#[cfg(test)]
pub(crate) mod testing;
