//! Application layer with dependency injection container.
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │          Application Layer (app)           │
//! │  ┌──────────────────────────────────────┐  │
//! │  │  App (DI container) + AgentConfig    │  │
//! │  └──────────────────────────────────────┘  │
//! │                 │ owns                     │
//! │                 ▼                          │
//! │  ┌──────────────────────────────────────┐  │
//! │  │  Infrastructure (adapters)           │  │
//! │  │  - MsgPackRepository                 │  │
//! │  │  - InMemoryRepository                │  │
//! │  └──────────────────────────────────────┘  │
//! │                 │ implements               │
//! │                 ▼                          │
//! │  ┌──────────────────────────────────────┐  │
//! │  │  Domain Ports (ports)                │  │
//! │  │  - TableRepository trait             │  │
//! │  └──────────────────────────────────────┘  │
//! │                 │ used by                  │
//! │                 ▼                          │
//! │  ┌──────────────────────────────────────┐  │
//! │  │  Domain Logic                        │  │
//! │  │  - QLearningAgent                    │  │
//! │  │  - MinimaxSolver                     │  │
//! │  └──────────────────────────────────────┘  │
//! └────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod container;

pub use config::AgentConfig;
pub use container::{App, AppBuilder};
