//! graph-datagen library
//!
//! Command implementations behind the `graph-datagen` binary. The heavy
//! lifting lives in the workspace crates:
//!
//! - `datagen_core` - configuration documents, schema model, generated records
//! - `datagen_generator` - date expressions, property synthesis, node and
//!   relationship generation
//! - `datagen_cypher` - Cypher load-script emission and structural reading
//!
//! # CLI Usage
//!
//! ```bash
//! # Generate a load script from the documents in ./config
//! graph-datagen generate --config-dir ./config --seed 42 --output data.cypher
//!
//! # Report how node labels connect to each other
//! graph-datagen inspect --schema ./config/schema_analysis.json
//!
//! # Check that an emitted script can be read back unit by unit
//! graph-datagen verify data.cypher
//! ```

pub mod commands;

pub use commands::generate::GenerateArgs;
pub use commands::inspect::InspectArgs;
pub use commands::verify::VerifyArgs;
