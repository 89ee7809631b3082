//! Cypher load-script emitter and reader for graph-datagen.
//!
//! The emitter writes generated records as `:param` payloads followed by
//! `UNWIND` statements that upsert nodes by identifier and relationships by
//! pattern, so reloading the same script does not duplicate anything. The
//! reader parses such a script back into units for loaders.
//!
//! # Example
//!
//! ```rust
//! use datagen_cypher::parse_script;
//!
//! let script = "\
//! // --- Creating nodes for Label: Tag ---
//! :param nodes_Tag => [{\"tagID\":\"Tag_0001\",\"name\":\"a;b\"}];
//! UNWIND $nodes_Tag AS node_props
//! MERGE (n:Tag { tagID: node_props.tagID })
//! SET n += node_props;
//! ";
//!
//! let units = parse_script(script).unwrap();
//! assert_eq!(units.len(), 1);
//! assert_eq!(units[0].parameter, "nodes_Tag");
//! assert_eq!(units[0].rows(), 1);
//! ```

pub mod emitter;
pub mod error;
pub mod escape;
pub mod script;

pub use emitter::{CypherEmitter, EmitStats, ScriptHeader, DEFAULT_OUTPUT_FILENAME};
pub use error::{EmitError, ScriptError};
pub use escape::{escape_identifier, is_valid_identifier, sanitize_param_name};
pub use script::{parse_script, ScriptReader, ScriptUnit};
