pub mod collector;
pub mod color_service;
pub mod enrich_service;
pub mod fiat_service;
pub mod history_service;
pub mod icon_bundle;
pub mod manifest_service;
pub mod overlay_service;
