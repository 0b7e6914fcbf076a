//! Cross-component integration flows, driven through [`poi_engine::PoiEngine`].

pub mod ledger_flows;
pub mod scheduler;
