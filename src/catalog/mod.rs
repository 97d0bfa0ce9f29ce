pub mod city_catalog;
pub mod error;
pub mod prepare;
