// src/integrations/mod.rs
//
// External Integrations Module

pub mod catalog_api;
pub mod rawg;

pub use catalog_api::CatalogApi;
#[cfg(test)]
pub use catalog_api::MockCatalogApi;
pub use rawg::client::RawgClient;
