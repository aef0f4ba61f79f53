// foodshare-core/src/lib.rs

// 1. Documentation
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Le contrat du store (Connector)
pub mod ports;

// 2. Domain (Cœur du métier)
// Schéma, entités, catalogue de requêtes, règles d'intégrité, horloge.
// Ne dépend de RIEN d'autre (ni infra, ni app).
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB, lecture CSV, configuration projet, écriture atomique
pub mod infrastructure;

// 4. Application (Use Cases)
// Ingestion, vérification, rapports, exploration, export
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::FoodshareError;
