pub mod lat_lon;
pub mod series;
pub mod unit_system;
