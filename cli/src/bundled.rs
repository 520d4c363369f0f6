//! Scripts compiled into the binary from `cli/sql/`.

include!(concat!(env!("OUT_DIR"), "/bundled.rs"));
