#![warn(missing_docs)]

//! **dlis** handles the reading and writing of the RP66 V1 Digital Log Interchange Standard
//! (DLIS) format.
//!
//! A DLIS physical file starts with a [storage unit label], followed by a stream of visible
//! records. The payloads of the visible records form a continuous stream of logical record
//! segments, which are reassembled into [logical records]. Explicitly formatted logical records
//! carry [sets] of self-describing objects; indirectly formatted records carry bulk frame data
//! for the [frames] declared by those sets.
//!
//! [storage unit label]: StorageUnitLabel
//! [logical records]: LogicalRecord
//! [sets]: Set
//! [frames]: Frame
//!
//! # Examples
//!
//! ## Read all logical files
//!
//! ```no_run
//! let mut reader = dlis::io::reader::Builder::default().build_from_path("sample.dlis")?;
//! let label = reader.read_storage_unit_label()?;
//! println!("{}", label.storage_set_identifier());
//!
//! let (logical_files, diagnostics) = reader.read_logical_files()?;
//!
//! for logical_file in &logical_files {
//!     for frame in logical_file.frames() {
//!         println!("{}: {} rows", frame.name(), frame.row_count());
//!     }
//! }
//!
//! for diagnostic in &diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! # Ok::<_, std::io::Error>(())
//! ```

#[cfg(feature = "async")]
pub mod r#async;

pub mod component;
pub mod diagnostics;
pub mod frame;
pub mod io;
pub mod logical_file;
pub mod logical_record;
pub mod representation_code;
pub mod set;
pub mod storage_unit_label;
pub mod value;

pub use self::{
    component::Component,
    diagnostics::Diagnostic,
    frame::{Curve, Frame},
    logical_file::{EncryptedRecord, IndirectRecord, LogicalFile},
    logical_record::LogicalRecord,
    representation_code::RepresentationCode,
    set::Set,
    storage_unit_label::StorageUnitLabel,
    value::Value,
};
