//! Analysis agents
//!
//! - [`executor::ToolAgent`] runs the model/tool loop every analyst shares
//! - [`router::Router`] turns the free-text query into a [`crate::RouterDecision`]
//! - [`analysts`] defines the four specialist analysts
//! - [`investment`] synthesizes analyst prose into the investment outlook

pub mod analysts;
pub mod executor;
pub mod investment;
pub mod prompts;
pub mod router;

pub use analysts::{Analyst, AnalystKind, DataClients};
pub use executor::{AgentConfig, ToolAgent};
pub use investment::InvestmentSynthesizer;
pub use router::Router;
